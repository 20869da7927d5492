//! 注解装配层的端到端集成测试
//!
//! 覆盖从组件目录到容器刷新的完整链路：组件扫描、工厂方法
//! 注册、导入处理以及发现的定义后置处理器。

use async_trait::async_trait;
use ioc_abstractions::container::BeanContainer;
use ioc_abstractions::introspector::{
    constructor_of, definition_processor_caster_of, method_of,
};
use ioc_abstractions::processor::DefinitionPostProcessor;
use ioc_abstractions::registry::DefinitionRegistry;
use ioc_common::metadata::markers;
use ioc_common::{
    BeanScope, ConfigurationError, ConfigurationResult, MarkerMetadata, MarkerMethodMetadata,
};
use ioc_composition::{AnnotationContainerBuilder, ComponentCatalog};
use serde_json::json;
use std::sync::Arc;

struct UserRepository;

struct UserService;

struct OrderService;

/// 配置类，声明组件扫描与一个实例工厂方法
struct AppConfig;

impl AppConfig {
    fn order_service(&self) -> OrderService {
        OrderService
    }
}

fn catalog_with_services() -> Arc<ComponentCatalog> {
    let catalog = Arc::new(ComponentCatalog::new());
    catalog.register(
        MarkerMetadata::new("app::service::UserRepository", "app::service")
            .with_marker(markers::COMPONENT),
    );
    catalog.register(
        MarkerMetadata::new("app::service::UserService", "app::service")
            .with_marker(markers::COMPONENT),
    );
    catalog
}

fn app_config_metadata() -> MarkerMetadata {
    MarkerMetadata::new("app::AppConfig", "app")
        .with_marker(markers::CONFIGURATION)
        .with_attribute(markers::COMPONENT_SCAN, "basePackages", json!(["app::service"]))
        .with_method(MarkerMethodMetadata::new("order_service").with_marker(markers::BEAN))
}

#[tokio::test]
async fn test_component_scan_end_to_end() -> anyhow::Result<()> {
    let container = AnnotationContainerBuilder::new()
        .with_catalog(catalog_with_services())
        .register_configuration(app_config_metadata())
        .build()?;

    let introspector = container.introspector();
    introspector.register_constructor("app::AppConfig", constructor_of(|| AppConfig));
    introspector.register_constructor(
        "app::service::UserRepository",
        constructor_of(|| UserRepository),
    );
    introspector.register_constructor("app::service::UserService", constructor_of(|| UserService));
    introspector.register_method(
        "app::AppConfig",
        "order_service",
        0,
        method_of(AppConfig::order_service),
    );

    container.refresh().await?;

    // 扫描发现的组件与工厂方法派生的 Bean 均可获取
    assert!(container.get_bean("userRepository").is_ok());
    assert!(container.get_bean("userService").is_ok());
    assert!(container.get_bean_as::<OrderService>("order_service").is_ok());
    assert!(container.get_bean_as::<AppConfig>("appConfig").is_ok());
    assert_eq!(container.stats().definition_count, 4);
    Ok(())
}

#[tokio::test]
async fn test_scanned_singleton_identity() -> anyhow::Result<()> {
    let container = AnnotationContainerBuilder::new()
        .with_catalog(catalog_with_services())
        .register_configuration(app_config_metadata())
        .build()?;

    let introspector = container.introspector();
    introspector.register_constructor("app::AppConfig", constructor_of(|| AppConfig));
    introspector.register_constructor(
        "app::service::UserRepository",
        constructor_of(|| UserRepository),
    );
    introspector.register_constructor("app::service::UserService", constructor_of(|| UserService));
    introspector.register_method(
        "app::AppConfig",
        "order_service",
        0,
        method_of(AppConfig::order_service),
    );

    container.refresh().await?;

    let first = container.get_bean("userService")?;
    let second = container.get_bean("userService")?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[tokio::test]
async fn test_import_registers_qualified_type() -> anyhow::Result<()> {
    let catalog = Arc::new(ComponentCatalog::new());
    let metadata = MarkerMetadata::new("app::AppConfig", "app")
        .with_marker(markers::CONFIGURATION)
        .with_attribute(markers::IMPORT, "value", json!(["app::service::UserRepository"]));

    let container = AnnotationContainerBuilder::new()
        .with_catalog(catalog)
        .register_configuration(metadata)
        .build()?;

    let introspector = container.introspector();
    introspector.register_constructor("app::AppConfig", constructor_of(|| AppConfig));
    introspector.register_constructor(
        "app::service::UserRepository",
        constructor_of(|| UserRepository),
    );

    container.refresh().await?;

    // 导入的类型以全限定名为 Bean 名称
    assert!(container.contains_bean("app::service::UserRepository"));
    assert!(container
        .get_bean_as::<UserRepository>("app::service::UserRepository")
        .is_ok());
    Ok(())
}

#[tokio::test]
async fn test_lazy_component_not_eagerly_instantiated() -> anyhow::Result<()> {
    let catalog = Arc::new(ComponentCatalog::new());
    catalog.register(
        MarkerMetadata::new("app::service::UserRepository", "app::service")
            .with_marker(markers::COMPONENT)
            .with_marker(markers::LAZY),
    );

    let metadata = MarkerMetadata::new("app::AppConfig", "app")
        .with_marker(markers::CONFIGURATION)
        .with_attribute(markers::COMPONENT_SCAN, "value", json!(["app::service"]));

    let container = AnnotationContainerBuilder::new()
        .with_catalog(catalog)
        .register_configuration(metadata)
        .build()?;

    let introspector = container.introspector();
    introspector.register_constructor("app::AppConfig", constructor_of(|| AppConfig));
    introspector.register_constructor(
        "app::service::UserRepository",
        constructor_of(|| UserRepository),
    );

    container.refresh().await?;

    // 只有配置类本身被预实例化
    assert_eq!(container.stats().singleton_count, 1);
    assert!(container.get_bean("userRepository").is_ok());
    assert_eq!(container.stats().singleton_count, 2);
    Ok(())
}

/// 把目标 Bean 改为原型作用域的定义后置处理器
struct ScopeAdjuster;

#[async_trait]
impl DefinitionPostProcessor for ScopeAdjuster {
    fn name(&self) -> &str {
        "scopeAdjuster"
    }

    async fn post_process_definitions(
        &self,
        registry: &dyn DefinitionRegistry,
    ) -> ConfigurationResult<()> {
        let descriptor = registry
            .get("userService")
            .map_err(ConfigurationError::post_processing)?;
        registry
            .register(descriptor.with_scope(BeanScope::Prototype))
            .map_err(ConfigurationError::post_processing)?;
        Ok(())
    }
}

#[tokio::test]
async fn test_scanned_definition_processor_runs_before_instantiation() -> anyhow::Result<()> {
    let catalog = catalog_with_services();
    // 处理器自身也通过扫描进入注册表
    catalog.register(
        MarkerMetadata::new("app::service::ScopeAdjuster", "app::service")
            .with_marker(markers::COMPONENT),
    );

    let container = AnnotationContainerBuilder::new()
        .with_catalog(catalog)
        .register_configuration(app_config_metadata())
        .build()?;

    let introspector = container.introspector();
    introspector.register_constructor("app::AppConfig", constructor_of(|| AppConfig));
    introspector.register_constructor(
        "app::service::UserRepository",
        constructor_of(|| UserRepository),
    );
    introspector.register_constructor("app::service::UserService", constructor_of(|| UserService));
    introspector.register_constructor("app::service::ScopeAdjuster", constructor_of(|| ScopeAdjuster));
    introspector.register_definition_processor_caster(
        "app::service::ScopeAdjuster",
        definition_processor_caster_of::<ScopeAdjuster>(),
    );
    introspector.register_method(
        "app::AppConfig",
        "order_service",
        0,
        method_of(AppConfig::order_service),
    );

    container.refresh().await?;

    // 处理器在预实例化前调整了作用域
    assert!(!container.is_singleton("userService")?);
    let first = container.get_bean("userService")?;
    let second = container.get_bean("userService")?;
    assert!(!Arc::ptr_eq(&first, &second));
    Ok(())
}
