//! 配置类解析器
//!
//! 处理候选配置类：执行组件扫描指令并把新发现的候选加入
//! 解析队列，收集工厂方法供读取器注册。解析本身不登记
//! 工厂方法派生的定义。

use crate::annotations::is_configuration_candidate;
use crate::configuration_class::ConfigurationClass;
use ioc_abstractions::registry::DefinitionRegistry;
use ioc_abstractions::scanner::ComponentScanner;
use ioc_common::metadata::markers;
use ioc_common::{AnnotationMetadata, ConfigurationError, ConfigurationResult};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

/// 配置类解析器
pub struct ConfigurationClassParser {
    scanner: Arc<dyn ComponentScanner>,
}

impl ConfigurationClassParser {
    /// 基于组件扫描器创建解析器
    pub fn new(scanner: Arc<dyn ComponentScanner>) -> Self {
        Self { scanner }
    }

    /// 解析候选配置类
    ///
    /// 组件扫描发现的候选若自身也是配置候选，则加入队列继续
    /// 解析，直到队列耗尽。
    pub async fn parse(
        &self,
        candidate_names: &[String],
        registry: &dyn DefinitionRegistry,
    ) -> ConfigurationResult<Vec<ConfigurationClass>> {
        let mut queue: VecDeque<String> = candidate_names.iter().cloned().collect();
        let mut parsed: HashSet<String> = HashSet::new();
        let mut classes = Vec::new();

        while let Some(name) = queue.pop_front() {
            if !parsed.insert(name.clone()) {
                continue;
            }

            let descriptor = match registry.get(&name) {
                Ok(descriptor) => descriptor,
                Err(error) => {
                    warn!("候选配置类 '{}' 已不在注册表中, 跳过解析: {}", name, error);
                    continue;
                }
            };

            let Some(metadata) = descriptor.source_metadata.clone() else {
                debug!("候选 '{}' 没有标记元数据, 跳过解析", name);
                continue;
            };
            if !is_configuration_candidate(metadata.as_ref()) {
                debug!("候选 '{}' 不携带配置相关标记, 跳过解析", name);
                continue;
            }

            let class = ConfigurationClass::new(&name, Arc::clone(&metadata));

            if metadata.is_annotated(markers::COMPONENT_SCAN) {
                self.process_component_scan(&class, registry, &mut queue)
                    .await?;
            }

            debug!(
                "解析配置类 '{}': {} 个工厂方法, {} 个导入",
                name,
                class.bean_methods.len(),
                class.imports.len()
            );
            classes.push(class);
        }

        Ok(classes)
    }

    async fn process_component_scan(
        &self,
        class: &ConfigurationClass,
        registry: &dyn DefinitionRegistry,
        queue: &mut VecDeque<String>,
    ) -> ConfigurationResult<()> {
        let metadata = class.metadata.as_ref();
        let mut base_packages = metadata.string_list_attribute(markers::COMPONENT_SCAN, "value");
        base_packages.extend(metadata.string_list_attribute(markers::COMPONENT_SCAN, "basePackages"));
        base_packages.dedup();
        if base_packages.is_empty() {
            // 未指定基础包时落回声明类型所在模块
            base_packages.push(metadata.module_path.clone());
        }

        let include_markers =
            metadata.string_list_attribute(markers::COMPONENT_SCAN, "includeFilters");
        let exclude_markers =
            metadata.string_list_attribute(markers::COMPONENT_SCAN, "excludeFilters");

        let scanned = self
            .scanner
            .scan(&base_packages, &include_markers, &exclude_markers)
            .await?;

        for descriptor in scanned {
            // 声明扫描的配置类自身不重复注册
            if descriptor.type_ref.as_deref() == Some(metadata.class_name.as_str()) {
                continue;
            }
            if registry.contains(&descriptor.name) {
                debug!("扫描到的组件 '{}' 已注册, 跳过", descriptor.name);
                continue;
            }

            let scanned_name = descriptor.name.clone();
            let is_candidate = descriptor
                .source_metadata
                .as_deref()
                .is_some_and(|source| is_configuration_candidate(source));

            registry
                .register(descriptor)
                .map_err(ConfigurationError::post_processing)?;

            if is_candidate {
                queue.push_back(scanned_name);
            }
        }

        Ok(())
    }
}
