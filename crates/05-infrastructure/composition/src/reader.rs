//! 配置类读取器
//!
//! 把解析产物落地为注册表中的 Bean 定义：先注册导入的类型，
//! 再注册工厂方法派生的定义。已存在的同名定义视为被覆盖声明，
//! 跳过注册。

use crate::annotations::apply_common_attributes;
use crate::catalog::ComponentCatalog;
use crate::configuration_class::{BeanMethod, ConfigurationClass};
use ioc_abstractions::registry::DefinitionRegistry;
use ioc_common::{BeanDescriptor, ConfigurationError, ConfigurationResult};
use std::sync::Arc;
use tracing::{debug, info};

/// 配置类读取器
pub struct ConfigurationClassReader {
    catalog: Arc<ComponentCatalog>,
}

impl ConfigurationClassReader {
    /// 基于组件目录创建读取器
    pub fn new(catalog: Arc<ComponentCatalog>) -> Self {
        Self { catalog }
    }

    /// 把配置类集合登记进注册表
    pub fn load_definitions(
        &self,
        classes: &[ConfigurationClass],
        registry: &dyn DefinitionRegistry,
    ) -> ConfigurationResult<()> {
        let mut registered = 0usize;

        for class in classes {
            for import in &class.imports {
                if self.register_import(import, registry)? {
                    registered += 1;
                }
            }
        }

        for class in classes {
            for method in &class.bean_methods {
                if self.register_bean_method(class, method, registry)? {
                    registered += 1;
                }
            }
        }

        info!("配置类读取完成, 新登记 {} 个 Bean 定义", registered);
        Ok(())
    }

    /// 导入的类型以全限定名作为 Bean 名称注册
    fn register_import(
        &self,
        type_name: &str,
        registry: &dyn DefinitionRegistry,
    ) -> ConfigurationResult<bool> {
        if registry.contains(type_name) {
            debug!("导入的类型 '{}' 已注册, 跳过", type_name);
            return Ok(false);
        }

        let mut descriptor = BeanDescriptor::new(type_name).with_type_ref(type_name);
        if let Some(candidate) = self.catalog.find_by_type(type_name) {
            descriptor = apply_common_attributes(
                descriptor.with_source_metadata(Arc::clone(&candidate.metadata)),
                candidate.metadata.as_ref(),
            );
        }

        registry
            .register(descriptor)
            .map_err(ConfigurationError::post_processing)?;
        debug!("注册导入的类型: {}", type_name);
        Ok(true)
    }

    fn register_bean_method(
        &self,
        class: &ConfigurationClass,
        method: &BeanMethod,
        registry: &dyn DefinitionRegistry,
    ) -> ConfigurationResult<bool> {
        let bean_name = method.bean_name();
        if registry.contains(&bean_name) {
            debug!(
                "工厂方法 '{}' 的 Bean 定义 '{}' 已存在, 视为被覆盖, 跳过注册",
                method.metadata.method_name, bean_name
            );
            return Ok(false);
        }

        let mut descriptor = BeanDescriptor::new(&bean_name)
            .with_factory_method(&method.metadata.method_name)
            .with_source_metadata(Arc::clone(&class.metadata))
            .with_autowire_candidate(method.autowire_candidate());

        if method.metadata.is_static {
            descriptor = descriptor.with_type_ref(&method.declaring_type);
        } else {
            descriptor = descriptor.with_factory_owner(&class.bean_name);
        }

        if let Some(init) = method.init_method() {
            descriptor = descriptor.with_init_hook(init);
        }
        if let Some(destroy) = method.destroy_method() {
            descriptor = descriptor.with_destroy_hook(destroy);
        }

        let descriptor = apply_common_attributes(descriptor, &method.metadata);

        registry
            .register(descriptor)
            .map_err(ConfigurationError::post_processing)?;
        debug!(
            "注册工厂方法派生的 Bean 定义: {} ({}::{})",
            bean_name, method.declaring_type, method.metadata.method_name
        );
        Ok(true)
    }
}
