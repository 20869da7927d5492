//! 组件扫描器抽象接口
//!
//! 提供自动发现候选组件的能力

use async_trait::async_trait;
use ioc_common::{BeanDescriptor, ConfigurationResult};

/// 组件扫描器 trait
///
/// 在给定的基础包范围内发现候选组件并产出 Bean 定义
#[async_trait]
pub trait ComponentScanner: Send + Sync {
    /// 扫描基础包中的候选组件
    ///
    /// `include_markers` 为空时使用扫描器的默认包含过滤器；
    /// 命中任一 `exclude_markers` 的候选被排除。
    async fn scan(
        &self,
        base_packages: &[String],
        include_markers: &[String],
        exclude_markers: &[String],
    ) -> ConfigurationResult<Vec<BeanDescriptor>>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}
