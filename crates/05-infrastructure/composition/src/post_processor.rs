//! 配置类注册表后置处理器
//!
//! 在容器刷新期间从注册表挑出配置候选，交由解析器与读取器
//! 完成组件扫描和定义登记。

use crate::annotations::is_configuration_candidate;
use crate::catalog::ComponentCatalog;
use crate::parser::ConfigurationClassParser;
use crate::reader::ConfigurationClassReader;
use crate::scanner::CatalogComponentScanner;
use async_trait::async_trait;
use ioc_abstractions::processor::RegistryPostProcessor;
use ioc_abstractions::registry::DefinitionRegistry;
use ioc_abstractions::scanner::ComponentScanner;
use ioc_common::ConfigurationResult;
use std::sync::Arc;
use tracing::{debug, info};

/// 配置类后置处理器的注册名
pub const CONFIGURATION_CLASS_POST_PROCESSOR: &str = "configurationClassPostProcessor";

/// 配置类后置处理器
pub struct ConfigurationClassPostProcessor {
    parser: ConfigurationClassParser,
    reader: ConfigurationClassReader,
}

impl ConfigurationClassPostProcessor {
    /// 基于组件目录创建处理器，使用目录扫描器
    pub fn new(catalog: Arc<ComponentCatalog>) -> Self {
        let scanner: Arc<dyn ComponentScanner> =
            Arc::new(CatalogComponentScanner::new(Arc::clone(&catalog)));
        Self::with_scanner(catalog, scanner)
    }

    /// 基于指定扫描器创建处理器
    pub fn with_scanner(catalog: Arc<ComponentCatalog>, scanner: Arc<dyn ComponentScanner>) -> Self {
        Self {
            parser: ConfigurationClassParser::new(scanner),
            reader: ConfigurationClassReader::new(catalog),
        }
    }

    fn select_candidates(registry: &dyn DefinitionRegistry) -> Vec<String> {
        let mut candidates = Vec::new();
        for name in registry.names() {
            let Ok(descriptor) = registry.get(&name) else {
                continue;
            };
            let is_candidate = descriptor
                .source_metadata
                .as_deref()
                .is_some_and(|metadata| is_configuration_candidate(metadata));
            if is_candidate {
                candidates.push(name);
            }
        }
        candidates
    }
}

#[async_trait]
impl RegistryPostProcessor for ConfigurationClassPostProcessor {
    fn name(&self) -> &str {
        CONFIGURATION_CLASS_POST_PROCESSOR
    }

    async fn post_process_registry(
        &self,
        registry: &dyn DefinitionRegistry,
    ) -> ConfigurationResult<()> {
        let candidates = Self::select_candidates(registry);
        if candidates.is_empty() {
            debug!("注册表中没有配置候选, 跳过配置类处理");
            return Ok(());
        }

        info!("发现 {} 个配置候选, 开始解析", candidates.len());
        let classes = self.parser.parse(&candidates, registry).await?;
        self.reader.load_definitions(&classes, registry)?;
        Ok(())
    }
}
