//! 注解容器装配入口
//!
//! 把组件目录、配置类后置处理器与容器核心拼装在一起，
//! 调用方注册配置类元数据后刷新容器即可使用。

use crate::annotations::decapitalize;
use crate::catalog::{global_catalog, ComponentCatalog};
use crate::post_processor::ConfigurationClassPostProcessor;
use ioc_abstractions::container::{BeanContainer, ContainerConfig};
use ioc_common::{BeanDescriptor, ContainerResult, MarkerMetadata};
use ioc_impl::IocContainer;
use std::sync::Arc;

/// 注解容器构建器
pub struct AnnotationContainerBuilder {
    config: ContainerConfig,
    catalog: Option<Arc<ComponentCatalog>>,
    descriptors: Vec<BeanDescriptor>,
}

impl AnnotationContainerBuilder {
    /// 创建构建器
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            catalog: None,
            descriptors: Vec::new(),
        }
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 指定组件目录，缺省使用进程级共享目录
    pub fn with_catalog(mut self, catalog: Arc<ComponentCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// 直接追加 Bean 定义
    pub fn register(mut self, descriptor: BeanDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// 注册配置类元数据
    ///
    /// Bean 名称取首字母小写的简单类型名
    pub fn register_configuration(mut self, metadata: MarkerMetadata) -> Self {
        let bean_name = decapitalize(metadata.simple_name());
        let descriptor = BeanDescriptor::new(bean_name)
            .with_type_ref(&metadata.class_name)
            .with_source_metadata(Arc::new(metadata));
        self.descriptors.push(descriptor);
        self
    }

    /// 装配容器
    ///
    /// 配置类后置处理器以手工处理器身份挂入容器，刷新时最先执行
    pub fn build(self) -> ContainerResult<IocContainer> {
        let catalog = self.catalog.unwrap_or_else(global_catalog);
        let processor = ConfigurationClassPostProcessor::new(catalog);

        let container = IocContainer::builder()
            .with_config(self.config)
            .add_registry_processor(Arc::new(processor))
            .build();

        for descriptor in self.descriptors {
            container.register(descriptor)?;
        }

        Ok(container)
    }
}

impl Default for AnnotationContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
