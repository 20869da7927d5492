//! 配置类模型
//!
//! 解析阶段的中间产物：配置类自身的元数据、其导入的类型，
//! 以及收集到的工厂方法。收集与注册分离，注册由读取器完成。

use ioc_common::metadata::markers;
use ioc_common::{AnnotationMetadata, MarkerMetadata, MarkerMethodMetadata};
use std::sync::Arc;

/// 配置类上的工厂方法
#[derive(Debug, Clone)]
pub struct BeanMethod {
    /// 方法元数据
    pub metadata: MarkerMethodMetadata,
    /// 声明该方法的类型全限定名
    pub declaring_type: String,
}

impl BeanMethod {
    /// 创建工厂方法模型
    pub fn new(metadata: MarkerMethodMetadata, declaring_type: impl Into<String>) -> Self {
        Self {
            metadata,
            declaring_type: declaring_type.into(),
        }
    }

    /// 显式指定的 Bean 名称列表
    ///
    /// `name` 与 `value` 属性等价，`name` 优先
    pub fn explicit_names(&self) -> Vec<String> {
        let names = self.metadata.string_list_attribute(markers::BEAN, "name");
        if !names.is_empty() {
            return names;
        }
        self.metadata.string_list_attribute(markers::BEAN, "value")
    }

    /// 该方法产出的 Bean 名称：显式名称优先，否则取方法名
    pub fn bean_name(&self) -> String {
        self.explicit_names()
            .into_iter()
            .next()
            .unwrap_or_else(|| self.metadata.method_name.clone())
    }

    /// 初始化回调方法名称
    pub fn init_method(&self) -> Option<String> {
        self.metadata
            .string_attribute(markers::BEAN, "initMethod")
            .filter(|method| !method.is_empty())
    }

    /// 销毁回调方法名称
    pub fn destroy_method(&self) -> Option<String> {
        self.metadata
            .string_attribute(markers::BEAN, "destroyMethod")
            .filter(|method| !method.is_empty())
    }

    /// 是否作为自动装配候选，缺省为真
    pub fn autowire_candidate(&self) -> bool {
        self.metadata
            .bool_attribute(markers::BEAN, "autowireCandidate")
            .unwrap_or(true)
    }
}

/// 解析后的配置类
#[derive(Debug, Clone)]
pub struct ConfigurationClass {
    /// 配置类的标记元数据
    pub metadata: Arc<MarkerMetadata>,
    /// 配置类自身的 Bean 名称
    pub bean_name: String,
    /// 导入的类型全限定名
    pub imports: Vec<String>,
    /// 收集到的工厂方法
    pub bean_methods: Vec<BeanMethod>,
}

impl ConfigurationClass {
    /// 创建配置类模型并收集其工厂方法与导入
    pub fn new(bean_name: impl Into<String>, metadata: Arc<MarkerMetadata>) -> Self {
        let imports = metadata.string_list_attribute(markers::IMPORT, "value");
        let bean_methods = metadata
            .methods
            .iter()
            .filter(|method| method.is_annotated(markers::BEAN))
            .map(|method| BeanMethod::new(method.clone(), metadata.class_name.clone()))
            .collect();

        Self {
            metadata,
            bean_name: bean_name.into(),
            imports,
            bean_methods,
        }
    }
}
