//! 后置处理器抽象接口
//!
//! 两类处理器在刷新期间各至多执行一次：先是全部注册表后置
//! 处理器（可增删定义），然后才是定义后置处理器（可修改既有
//! 定义的字段）。

use crate::registry::DefinitionRegistry;
use async_trait::async_trait;
use ioc_common::ConfigurationResult;

/// 注册表后置处理器
///
/// 可向注册表添加或移除 Bean 定义。可被发现的处理器其
/// [`RegistryPostProcessor::name`] 必须与其定义名一致，
/// 用于去重。
#[async_trait]
pub trait RegistryPostProcessor: Send + Sync {
    /// 处理器名称
    fn name(&self) -> &str;

    /// 处理注册表
    async fn post_process_registry(
        &self,
        registry: &dyn DefinitionRegistry,
    ) -> ConfigurationResult<()>;
}

/// 定义后置处理器
///
/// 可修改既有 Bean 定义的字段，例如调整作用域
#[async_trait]
pub trait DefinitionPostProcessor: Send + Sync {
    /// 处理器名称
    fn name(&self) -> &str;

    /// 处理既有定义
    async fn post_process_definitions(
        &self,
        registry: &dyn DefinitionRegistry,
    ) -> ConfigurationResult<()>;
}
