//! 实例创建调度抽象接口

use crate::singleton::BeanInstance;
use ioc_common::{BeanDescriptor, ContainerResult, CreationResult};

/// Bean 解析能力
///
/// 实例创建过程中解析工厂 Bean 依赖的回调通道，由容器实现。
/// 解析可能递归触发嵌套创建。
pub trait BeanResolver: Send + Sync {
    /// 按名称解析 Bean 实例
    fn resolve_bean(&self, name: &str) -> ContainerResult<BeanInstance>;

    /// 按名称解析 Bean 的类型名
    fn resolve_type(&self, name: &str) -> ContainerResult<Option<String>>;
}

/// 实例创建调度器
///
/// 按定义的构造路径分派：实例工厂方法、静态工厂方法、无参构造函数，
/// 首个命中的路径生效。
pub trait InstanceCreator: Send + Sync {
    /// 依据定义创建实例
    ///
    /// `explicit_args` 给定时按参数个数匹配工厂方法，否则调用无参形式。
    /// 返回 `None` 表示工厂方法产出了空实例。
    fn create(
        &self,
        descriptor: &BeanDescriptor,
        explicit_args: Option<&[BeanInstance]>,
        resolver: &dyn BeanResolver,
    ) -> CreationResult<Option<BeanInstance>>;
}
