//! 容器门面抽象接口

use crate::singleton::BeanInstance;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ioc_common::{BeanDescriptor, ContainerResult, RegistryResult};
use serde::{Deserialize, Serialize};

/// 容器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// 是否允许覆盖已存在的 Bean 定义
    pub allow_definition_override: bool,
    /// 刷新时是否预实例化非延迟的单例
    pub eager_singleton_init: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            allow_definition_override: true,
            eager_singleton_init: true,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContainerStats {
    /// 已注册的 Bean 定义数量
    pub definition_count: usize,
    /// 成品单例数量
    pub singleton_count: usize,
    /// 容器是否处于活动状态
    pub active: bool,
    /// 最近一次刷新的启动时间
    pub startup_time: Option<DateTime<Utc>>,
}

/// Bean 容器门面
///
/// 生命周期：`new` -> `register`* -> `refresh` -> `get_bean`*。
/// 刷新失败后容器进入非活动状态，不发布部分成功的结果。
#[async_trait]
pub trait BeanContainer: Send + Sync {
    /// 注册 Bean 定义
    fn register(&self, descriptor: BeanDescriptor) -> RegistryResult<()>;

    /// 刷新容器
    ///
    /// 执行后置处理器编排、冻结注册表并预实例化单例
    async fn refresh(&self) -> ContainerResult<()>;

    /// 按名称获取 Bean 实例
    fn get_bean(&self, name: &str) -> ContainerResult<BeanInstance>;

    /// 是否存在指定名称的 Bean（定义或成品单例）
    fn contains_bean(&self, name: &str) -> bool;

    /// 指定名称的 Bean 是否为单例
    fn is_singleton(&self, name: &str) -> ContainerResult<bool>;

    /// 获取指定名称 Bean 的类型名
    fn get_type(&self, name: &str) -> ContainerResult<Option<String>>;

    /// 获取容器统计信息
    fn stats(&self) -> ContainerStats;
}
