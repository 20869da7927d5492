//! 候选组件目录
//!
//! 没有运行时反射可扫描，类型在启动阶段把自身的标记元数据
//! 收录进目录，扫描器再按模块路径从目录发现候选。

use ioc_common::MarkerMetadata;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// 目录中的候选组件
#[derive(Debug, Clone)]
pub struct CandidateComponent {
    /// 类型全限定名
    pub type_name: String,
    /// 类型简单名称
    pub simple_name: String,
    /// 所在模块路径
    pub module_path: String,
    /// 标记元数据
    pub metadata: Arc<MarkerMetadata>,
}

impl CandidateComponent {
    /// 从标记元数据构造候选组件
    pub fn from_metadata(metadata: MarkerMetadata) -> Self {
        let simple_name = metadata.simple_name().to_string();
        let type_name = metadata.class_name.clone();
        let module_path = metadata.module_path.clone();
        Self {
            type_name,
            simple_name,
            module_path,
            metadata: Arc::new(metadata),
        }
    }
}

/// 组件目录
///
/// 按收录顺序保存候选组件，同名类型后收录的覆盖先收录的
pub struct ComponentCatalog {
    components: RwLock<Vec<CandidateComponent>>,
}

impl ComponentCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self {
            components: RwLock::new(Vec::new()),
        }
    }

    /// 收录候选组件
    pub fn register(&self, metadata: MarkerMetadata) {
        let candidate = CandidateComponent::from_metadata(metadata);
        let mut components = self.components.write();
        if let Some(existing) = components
            .iter_mut()
            .find(|component| component.type_name == candidate.type_name)
        {
            debug!("覆盖目录中已存在的候选组件: {}", candidate.type_name);
            *existing = candidate;
        } else {
            debug!("收录候选组件: {}", candidate.type_name);
            components.push(candidate);
        }
    }

    /// 按收录顺序返回全部候选组件
    pub fn components(&self) -> Vec<CandidateComponent> {
        self.components.read().clone()
    }

    /// 按类型全限定名查找候选组件
    pub fn find_by_type(&self, type_name: &str) -> Option<CandidateComponent> {
        self.components
            .read()
            .iter()
            .find(|component| component.type_name == type_name)
            .cloned()
    }

    /// 目录中候选组件数量
    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    /// 目录是否为空
    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_CATALOG: Lazy<Arc<ComponentCatalog>> = Lazy::new(|| Arc::new(ComponentCatalog::new()));

/// 进程级共享目录
///
/// 未显式指定目录时装配层使用此目录
pub fn global_catalog() -> Arc<ComponentCatalog> {
    Arc::clone(&GLOBAL_CATALOG)
}
