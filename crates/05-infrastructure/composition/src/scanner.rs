//! 基于组件目录的扫描器
//!
//! 按模块路径前缀在目录中发现候选组件，产出携带来源元数据的
//! Bean 定义。

use crate::annotations::{apply_common_attributes, decapitalize};
use crate::catalog::{CandidateComponent, ComponentCatalog};
use async_trait::async_trait;
use ioc_abstractions::scanner::ComponentScanner;
use ioc_common::metadata::markers;
use ioc_common::{AnnotationMetadata, BeanDescriptor, ConfigurationResult};
use std::sync::Arc;
use tracing::{debug, info};

/// 目录组件扫描器
pub struct CatalogComponentScanner {
    catalog: Arc<ComponentCatalog>,
}

impl CatalogComponentScanner {
    /// 基于指定目录创建扫描器
    pub fn new(catalog: Arc<ComponentCatalog>) -> Self {
        Self { catalog }
    }

    fn in_base_packages(candidate: &CandidateComponent, base_packages: &[String]) -> bool {
        base_packages.iter().any(|base| {
            let base = base.trim();
            !base.is_empty()
                && (candidate.module_path == base
                    || candidate
                        .module_path
                        .starts_with(&format!("{base}::")))
        })
    }

    fn passes_filters(
        candidate: &CandidateComponent,
        include_markers: &[String],
        exclude_markers: &[String],
    ) -> bool {
        if exclude_markers
            .iter()
            .any(|marker| candidate.metadata.is_annotated(marker))
        {
            return false;
        }

        if include_markers.is_empty() {
            // 缺省包含过滤器
            return candidate.metadata.is_annotated(markers::COMPONENT);
        }
        include_markers
            .iter()
            .any(|marker| candidate.metadata.is_annotated(marker))
    }

    /// 候选组件的 Bean 名称：组件标记的显式取值优先，否则取
    /// 首字母小写的简单名称
    fn bean_name(candidate: &CandidateComponent) -> String {
        if let Some(explicit) = candidate
            .metadata
            .string_attribute(markers::COMPONENT, "value")
        {
            if !explicit.is_empty() {
                return explicit;
            }
        }
        decapitalize(&candidate.simple_name)
    }
}

#[async_trait]
impl ComponentScanner for CatalogComponentScanner {
    async fn scan(
        &self,
        base_packages: &[String],
        include_markers: &[String],
        exclude_markers: &[String],
    ) -> ConfigurationResult<Vec<BeanDescriptor>> {
        debug!("在基础包 {:?} 中扫描候选组件", base_packages);

        let mut descriptors = Vec::new();
        for candidate in self.catalog.components() {
            if !Self::in_base_packages(&candidate, base_packages) {
                continue;
            }
            if !Self::passes_filters(&candidate, include_markers, exclude_markers) {
                continue;
            }

            let name = Self::bean_name(&candidate);
            let descriptor = BeanDescriptor::new(&name)
                .with_type_ref(&candidate.type_name)
                .with_source_metadata(Arc::clone(&candidate.metadata));
            let descriptor = apply_common_attributes(descriptor, candidate.metadata.as_ref());
            debug!("发现候选组件: {} -> {}", name, candidate.type_name);
            descriptors.push(descriptor);
        }

        info!(
            "组件扫描完成, 基础包 {:?} 中发现 {} 个候选",
            base_packages,
            descriptors.len()
        );
        Ok(descriptors)
    }

    fn name(&self) -> &str {
        "catalogComponentScanner"
    }
}
