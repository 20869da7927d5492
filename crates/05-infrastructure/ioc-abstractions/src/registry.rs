//! Bean 定义注册表抽象接口

use ioc_common::{BeanDescriptor, RegistryResult};

/// Bean 定义注册表
///
/// 按名称存储 [`BeanDescriptor`]，保留注册顺序供枚举使用。
/// 实现内部保证线程安全，方法均以共享引用调用。
/// 冻结后注册与移除均失败。
pub trait DefinitionRegistry: Send + Sync {
    /// 注册 Bean 定义
    ///
    /// 名称已存在时按覆盖策略决定替换或报错；覆盖不会改变
    /// 该名称在枚举顺序中的位置。
    fn register(&self, descriptor: BeanDescriptor) -> RegistryResult<()>;

    /// 获取指定名称的 Bean 定义
    fn get(&self, name: &str) -> RegistryResult<BeanDescriptor>;

    /// 是否存在指定名称的 Bean 定义
    fn contains(&self, name: &str) -> bool;

    /// 按注册顺序返回所有 Bean 名称的快照
    fn names(&self) -> Vec<String>;

    /// 已注册定义数量
    fn count(&self) -> usize;

    /// 移除指定名称的 Bean 定义并返回
    fn remove(&self, name: &str) -> RegistryResult<BeanDescriptor>;

    /// 冻结注册表配置
    fn freeze(&self);

    /// 注册表是否已冻结
    fn is_frozen(&self) -> bool;

    /// 是否允许覆盖已存在的定义
    fn allow_override(&self) -> bool;

    /// 设置覆盖策略
    fn set_allow_override(&self, allow: bool);
}
