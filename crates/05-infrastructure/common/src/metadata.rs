//! 标记元数据模型
//!
//! 注解能力的内存化表示。Rust 没有运行时反射，类型与方法上的标记
//! 以显式注册的键值结构承载，供配置管道读取。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 内置标记名称
pub mod markers {
    /// 配置类标记
    pub const CONFIGURATION: &str = "Configuration";
    /// 组件标记
    pub const COMPONENT: &str = "Component";
    /// 组件扫描标记
    pub const COMPONENT_SCAN: &str = "ComponentScan";
    /// 导入标记
    pub const IMPORT: &str = "Import";
    /// 工厂方法标记
    pub const BEAN: &str = "Bean";
    /// 延迟初始化标记
    pub const LAZY: &str = "Lazy";
    /// 首选候选标记
    pub const PRIMARY: &str = "Primary";
    /// 作用域标记
    pub const SCOPE: &str = "Scope";
}

/// 标记元数据能力
///
/// 提供按标记名查询存在性与属性的统一接口
pub trait AnnotationMetadata {
    /// 是否携带指定标记
    fn is_annotated(&self, marker: &str) -> bool;

    /// 获取指定标记的属性表
    fn get_attributes(&self, marker: &str) -> Option<&HashMap<String, Value>>;

    /// 读取字符串属性
    fn string_attribute(&self, marker: &str, key: &str) -> Option<String> {
        self.get_attributes(marker)
            .and_then(|attrs| attrs.get(key))
            .and_then(|value| value.as_str().map(ToString::to_string))
    }

    /// 读取字符串列表属性
    ///
    /// 单个字符串取值视为单元素列表
    fn string_list_attribute(&self, marker: &str, key: &str) -> Vec<String> {
        match self.get_attributes(marker).and_then(|attrs| attrs.get(key)) {
            Some(Value::String(single)) => vec![single.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(ToString::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// 读取布尔属性
    fn bool_attribute(&self, marker: &str, key: &str) -> Option<bool> {
        self.get_attributes(marker)
            .and_then(|attrs| attrs.get(key))
            .and_then(Value::as_bool)
    }
}

/// 方法级标记元数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerMethodMetadata {
    /// 方法名称
    pub method_name: String,
    /// 是否为静态方法
    pub is_static: bool,
    /// 标记名 -> 属性表
    pub markers: HashMap<String, HashMap<String, Value>>,
}

impl MarkerMethodMetadata {
    /// 创建新的方法元数据
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            is_static: false,
            markers: HashMap::new(),
        }
    }

    /// 设置静态方法标记
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// 附加标记
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.entry(marker.into()).or_default();
        self
    }

    /// 附加标记属性
    pub fn with_attribute(
        mut self,
        marker: impl Into<String>,
        key: impl Into<String>,
        value: Value,
    ) -> Self {
        self.markers
            .entry(marker.into())
            .or_default()
            .insert(key.into(), value);
        self
    }
}

impl AnnotationMetadata for MarkerMethodMetadata {
    fn is_annotated(&self, marker: &str) -> bool {
        self.markers.contains_key(marker)
    }

    fn get_attributes(&self, marker: &str) -> Option<&HashMap<String, Value>> {
        self.markers.get(marker)
    }
}

/// 类型级标记元数据
///
/// 携带类型的全限定名、所在模块路径、类型级标记以及方法级标记
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerMetadata {
    /// 类型全限定名
    pub class_name: String,
    /// 类型所在模块路径（包的对应物）
    pub module_path: String,
    /// 标记名 -> 属性表
    pub markers: HashMap<String, HashMap<String, Value>>,
    /// 方法级标记元数据
    pub methods: Vec<MarkerMethodMetadata>,
}

impl MarkerMetadata {
    /// 创建新的类型元数据
    pub fn new(class_name: impl Into<String>, module_path: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            module_path: module_path.into(),
            markers: HashMap::new(),
            methods: Vec::new(),
        }
    }

    /// 附加标记
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.entry(marker.into()).or_default();
        self
    }

    /// 附加标记属性
    pub fn with_attribute(
        mut self,
        marker: impl Into<String>,
        key: impl Into<String>,
        value: Value,
    ) -> Self {
        self.markers
            .entry(marker.into())
            .or_default()
            .insert(key.into(), value);
        self
    }

    /// 附加方法元数据
    pub fn with_method(mut self, method: MarkerMethodMetadata) -> Self {
        self.methods.push(method);
        self
    }

    /// 类型的简单名称（去掉模块路径前缀）
    pub fn simple_name(&self) -> &str {
        self.class_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.class_name)
    }
}

impl AnnotationMetadata for MarkerMetadata {
    fn is_annotated(&self, marker: &str) -> bool {
        self.markers.contains_key(marker)
    }

    fn get_attributes(&self, marker: &str) -> Option<&HashMap<String, Value>> {
        self.markers.get(marker)
    }
}
