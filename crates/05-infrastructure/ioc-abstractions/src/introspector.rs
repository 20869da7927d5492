//! 类型内省能力抽象接口
//!
//! Rust 没有运行时反射，构造函数与方法的按名查找通过编译期
//! 注册表实现：类型名、方法名与参数个数共同构成查找键，
//! 注册的闭包承担实际调用。

use crate::processor::{DefinitionPostProcessor, RegistryPostProcessor};
use crate::singleton::BeanInstance;
use ioc_common::{CreationError, CreationResult};
use std::sync::Arc;

/// 无参构造函数句柄
pub type ConstructorFn =
    Arc<dyn Fn(&[BeanInstance]) -> CreationResult<Option<BeanInstance>> + Send + Sync>;

/// 静态工厂方法句柄
pub type StaticMethodFn =
    Arc<dyn Fn(&[BeanInstance]) -> CreationResult<Option<BeanInstance>> + Send + Sync>;

/// 实例工厂方法句柄，首参为方法所属的 Bean 实例
pub type InstanceMethodFn = Arc<
    dyn Fn(&BeanInstance, &[BeanInstance]) -> CreationResult<Option<BeanInstance>> + Send + Sync,
>;

/// 注册表后置处理器的类型转换器
///
/// `Arc<dyn Any>` 无法直接向 trait 对象下转型，转换闭包在注册时
/// 捕获具体类型完成桥接
pub type RegistryProcessorCaster =
    Arc<dyn Fn(&BeanInstance) -> Option<Arc<dyn RegistryPostProcessor>> + Send + Sync>;

/// 定义后置处理器的类型转换器
pub type DefinitionProcessorCaster =
    Arc<dyn Fn(&BeanInstance) -> Option<Arc<dyn DefinitionPostProcessor>> + Send + Sync>;

/// 类型内省能力
pub trait TypeIntrospector: Send + Sync {
    /// 注册类型的无参构造函数
    fn register_constructor(&self, type_name: &str, constructor: ConstructorFn);

    /// 注册类型的静态工厂方法
    fn register_static_method(
        &self,
        type_name: &str,
        method_name: &str,
        arity: usize,
        method: StaticMethodFn,
    );

    /// 注册类型的实例工厂方法
    fn register_method(
        &self,
        type_name: &str,
        method_name: &str,
        arity: usize,
        method: InstanceMethodFn,
    );

    /// 查找类型的无参构造函数
    fn find_constructor(&self, type_name: &str) -> Option<ConstructorFn>;

    /// 按名称与参数个数精确查找静态工厂方法
    fn find_static_method(
        &self,
        type_name: &str,
        method_name: &str,
        arity: usize,
    ) -> Option<StaticMethodFn>;

    /// 按名称与参数个数精确查找实例工厂方法
    fn find_method(
        &self,
        type_name: &str,
        method_name: &str,
        arity: usize,
    ) -> Option<InstanceMethodFn>;

    /// 类型是否已注册任何能力
    fn has_type(&self, type_name: &str) -> bool;

    /// 注册类型到注册表后置处理器的转换器
    fn register_registry_processor_caster(&self, type_name: &str, caster: RegistryProcessorCaster);

    /// 注册类型到定义后置处理器的转换器
    fn register_definition_processor_caster(
        &self,
        type_name: &str,
        caster: DefinitionProcessorCaster,
    );

    /// 类型是否注册为注册表后置处理器
    fn has_registry_processor_caster(&self, type_name: &str) -> bool;

    /// 类型是否注册为定义后置处理器
    fn has_definition_processor_caster(&self, type_name: &str) -> bool;

    /// 将实例转换为注册表后置处理器
    fn cast_registry_processor(
        &self,
        type_name: &str,
        instance: &BeanInstance,
    ) -> Option<Arc<dyn RegistryPostProcessor>>;

    /// 将实例转换为定义后置处理器
    fn cast_definition_processor(
        &self,
        type_name: &str,
        instance: &BeanInstance,
    ) -> Option<Arc<dyn DefinitionPostProcessor>>;
}

/// 把无参构造闭包包装为构造函数句柄
pub fn constructor_of<T, F>(factory: F) -> ConstructorFn
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Arc::new(move |_args| Ok(Some(Arc::new(factory()) as BeanInstance)))
}

/// 把无参静态工厂闭包包装为静态方法句柄
pub fn static_method_of<T, F>(factory: F) -> StaticMethodFn
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Arc::new(move |_args| Ok(Some(Arc::new(factory()) as BeanInstance)))
}

/// 把实例工厂闭包包装为实例方法句柄
///
/// 调用时把持有者下转型为 `O`，类型不符报非法状态错误
pub fn method_of<O, T, F>(factory: F) -> InstanceMethodFn
where
    O: Send + Sync + 'static,
    T: Send + Sync + 'static,
    F: Fn(&O) -> T + Send + Sync + 'static,
{
    Arc::new(move |owner, _args| {
        let owner = owner.downcast_ref::<O>().ok_or_else(|| {
            CreationError::illegal_state("工厂 Bean 实例类型与注册的方法签名不匹配")
        })?;
        Ok(Some(Arc::new(factory(owner)) as BeanInstance))
    })
}

/// 把具体处理器类型包装为注册表后置处理器转换器
pub fn registry_processor_caster_of<P>() -> RegistryProcessorCaster
where
    P: RegistryPostProcessor + 'static,
{
    Arc::new(|instance| {
        instance
            .clone()
            .downcast::<P>()
            .ok()
            .map(|processor| processor as Arc<dyn RegistryPostProcessor>)
    })
}

/// 把具体处理器类型包装为定义后置处理器转换器
pub fn definition_processor_caster_of<P>() -> DefinitionProcessorCaster
where
    P: DefinitionPostProcessor + 'static,
{
    Arc::new(|instance| {
        instance
            .clone()
            .downcast::<P>()
            .ok()
            .map(|processor| processor as Arc<dyn DefinitionPostProcessor>)
    })
}
