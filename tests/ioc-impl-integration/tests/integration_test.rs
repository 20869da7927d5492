//! IoC 容器核心的集成测试

use async_trait::async_trait;
use ioc_abstractions::container::{BeanContainer, ContainerConfig};
use ioc_abstractions::introspector::{
    constructor_of, definition_processor_caster_of, method_of, registry_processor_caster_of,
    static_method_of,
};
use ioc_abstractions::processor::{DefinitionPostProcessor, RegistryPostProcessor};
use ioc_abstractions::registry::DefinitionRegistry;
use ioc_common::{
    BeanDescriptor, BeanScope, ConfigurationResult, ContainerError, CreationError, RegistryError,
};
use ioc_impl::IocContainer;
use std::sync::Arc;

/// 测试用仓储组件
struct UserRepository {
    datasource: String,
}

impl UserRepository {
    fn new() -> Self {
        Self {
            datasource: "内存数据源".to_string(),
        }
    }
}

/// 测试用配置类，承载实例工厂方法
struct AppConfig;

impl AppConfig {
    fn user_repository(&self) -> UserRepository {
        UserRepository::new()
    }
}

fn container_with_repository() -> IocContainer {
    let container = IocContainer::new();
    container
        .introspector()
        .register_constructor("it::UserRepository", constructor_of(UserRepository::new));
    container
        .register(BeanDescriptor::new("userRepository").with_type_ref("it::UserRepository"))
        .unwrap();
    container
}

#[tokio::test]
async fn test_singleton_identity_across_lookups() {
    let container = container_with_repository();
    container.refresh().await.unwrap();

    let first = container.get_bean("userRepository").unwrap();
    let second = container.get_bean("userRepository").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let typed = container.get_bean_as::<UserRepository>("userRepository").unwrap();
    assert_eq!(typed.datasource, "内存数据源");
}

#[tokio::test]
async fn test_prototype_yields_distinct_instances() {
    let container = IocContainer::new();
    container
        .introspector()
        .register_constructor("it::UserRepository", constructor_of(UserRepository::new));
    container
        .register(
            BeanDescriptor::new("userRepository")
                .with_type_ref("it::UserRepository")
                .with_scope(BeanScope::Prototype),
        )
        .unwrap();
    container.refresh().await.unwrap();

    let first = container.get_bean("userRepository").unwrap();
    let second = container.get_bean("userRepository").unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!container.is_singleton("userRepository").unwrap());
    // 原型不进入成品单例层
    assert_eq!(container.stats().singleton_count, 0);
}

#[tokio::test]
async fn test_static_factory_method() {
    let container = IocContainer::new();
    container.introspector().register_static_method(
        "it::UserRepository",
        "create",
        0,
        static_method_of(UserRepository::new),
    );
    container
        .register(
            BeanDescriptor::new("userRepository")
                .with_type_ref("it::UserRepository")
                .with_factory_method("create"),
        )
        .unwrap();
    container.refresh().await.unwrap();

    let repository = container.get_bean_as::<UserRepository>("userRepository").unwrap();
    assert_eq!(repository.datasource, "内存数据源");
}

#[tokio::test]
async fn test_instance_factory_method_creates_owner_first() {
    let container = IocContainer::new();
    let introspector = container.introspector();
    introspector.register_constructor("it::AppConfig", constructor_of(|| AppConfig));
    introspector.register_method(
        "it::AppConfig",
        "user_repository",
        0,
        method_of(AppConfig::user_repository),
    );

    container
        .register(BeanDescriptor::new("appConfig").with_type_ref("it::AppConfig"))
        .unwrap();
    container
        .register(
            BeanDescriptor::new("userRepository")
                .with_factory_owner("appConfig")
                .with_factory_method("user_repository"),
        )
        .unwrap();
    container.refresh().await.unwrap();

    assert!(container.get_bean("userRepository").is_ok());
    // 工厂 Bean 作为依赖被一并实例化
    assert!(container.contains_bean("appConfig"));
    assert_eq!(container.stats().singleton_count, 2);
}

#[tokio::test]
async fn test_self_referential_factory_is_rejected() {
    let container = IocContainer::new();
    container
        .register(
            BeanDescriptor::new("recursive")
                .with_factory_owner("recursive")
                .with_factory_method("make"),
        )
        .unwrap();

    let error = container.refresh().await.unwrap_err();
    assert!(matches!(
        error,
        ContainerError::Creation {
            source: CreationError::SelfReferentialFactory { .. }
        }
    ));
    // 刷新失败后容器进入非活动状态
    assert!(!container.stats().active);
}

#[tokio::test]
async fn test_missing_factory_method_reports_error() {
    let container = IocContainer::new();
    container
        .introspector()
        .register_constructor("it::UserRepository", constructor_of(UserRepository::new));
    container
        .register(
            BeanDescriptor::new("broken")
                .with_type_ref("it::UserRepository")
                .with_factory_method("missing"),
        )
        .unwrap();

    let error = container.refresh().await.unwrap_err();
    assert!(matches!(
        error,
        ContainerError::Creation {
            source: CreationError::FactoryMethodNotFound { .. }
        }
    ));
}

#[tokio::test]
async fn test_unregistered_type_has_no_default_constructor() {
    let container = IocContainer::new();
    container
        .register(BeanDescriptor::new("ghost").with_type_ref("it::Unknown"))
        .unwrap();

    let error = container.refresh().await.unwrap_err();
    assert!(matches!(
        error,
        ContainerError::Creation {
            source: CreationError::NoDefaultConstructor { .. }
        }
    ));
}

#[tokio::test]
async fn test_null_factory_result_cached_as_sentinel() -> anyhow::Result<()> {
    let container = IocContainer::new();
    container.introspector().register_static_method(
        "it::NullFactory",
        "nothing",
        0,
        Arc::new(|_args| Ok(None)),
    );
    container.register(
        BeanDescriptor::new("nothing")
            .with_type_ref("it::NullFactory")
            .with_factory_method("nothing"),
    )?;
    container.refresh().await?;

    // 预实例化容忍空结果，按名称获取时才报错
    assert!(container.contains_bean("nothing"));
    let error = container.get_bean("nothing").unwrap_err();
    assert!(matches!(
        error,
        ContainerError::Creation {
            source: CreationError::NullInstance { .. }
        }
    ));
    Ok(())
}

#[tokio::test]
async fn test_duplicate_definition_rejected_when_override_disabled() {
    let container = IocContainer::builder()
        .with_config(ContainerConfig {
            allow_definition_override: false,
            eager_singleton_init: true,
        })
        .build();

    container
        .register(BeanDescriptor::new("dup").with_type_ref("it::A"))
        .unwrap();
    let error = container
        .register(BeanDescriptor::new("dup").with_type_ref("it::B"))
        .unwrap_err();
    assert!(matches!(error, RegistryError::DuplicateDefinition { .. }));
}

#[tokio::test]
async fn test_registration_rejected_after_refresh() {
    let container = container_with_repository();
    container.refresh().await.unwrap();

    let error = container
        .register(BeanDescriptor::new("late").with_type_ref("it::Late"))
        .unwrap_err();
    assert!(matches!(error, RegistryError::Frozen { .. }));
}

/// 手工注册的注册表后置处理器，追加一个定义
struct ExtraBeanRegistrar;

#[async_trait]
impl RegistryPostProcessor for ExtraBeanRegistrar {
    fn name(&self) -> &str {
        "extraBeanRegistrar"
    }

    async fn post_process_registry(
        &self,
        registry: &dyn DefinitionRegistry,
    ) -> ConfigurationResult<()> {
        registry
            .register(BeanDescriptor::new("extraRepository").with_type_ref("it::UserRepository"))
            .map_err(ioc_common::ConfigurationError::post_processing)?;
        Ok(())
    }
}

/// 把指定 Bean 的作用域改为原型的定义后置处理器
struct PrototypeAdjuster {
    target: String,
}

#[async_trait]
impl DefinitionPostProcessor for PrototypeAdjuster {
    fn name(&self) -> &str {
        "prototypeAdjuster"
    }

    async fn post_process_definitions(
        &self,
        registry: &dyn DefinitionRegistry,
    ) -> ConfigurationResult<()> {
        let descriptor = registry
            .get(&self.target)
            .map_err(ioc_common::ConfigurationError::post_processing)?;
        registry
            .register(descriptor.with_scope(BeanScope::Prototype))
            .map_err(ioc_common::ConfigurationError::post_processing)?;
        Ok(())
    }
}

#[tokio::test]
async fn test_manual_post_processors_run_in_phases() {
    let container = container_with_repository();
    container.add_registry_processor(Arc::new(ExtraBeanRegistrar));
    container.add_definition_processor(Arc::new(PrototypeAdjuster {
        target: "extraRepository".to_string(),
    }));
    container.refresh().await.unwrap();

    // 注册表处理器追加的定义被定义处理器改成了原型
    assert!(container.contains_bean("extraRepository"));
    assert!(!container.is_singleton("extraRepository").unwrap());
    let first = container.get_bean("extraRepository").unwrap();
    let second = container.get_bean("extraRepository").unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_discovered_registry_processor_executes() {
    let container = container_with_repository();
    let introspector = container.introspector();
    introspector.register_constructor("it::ExtraBeanRegistrar", constructor_of(|| ExtraBeanRegistrar));
    introspector.register_registry_processor_caster(
        "it::ExtraBeanRegistrar",
        registry_processor_caster_of::<ExtraBeanRegistrar>(),
    );
    container
        .register(
            BeanDescriptor::new("extraBeanRegistrar").with_type_ref("it::ExtraBeanRegistrar"),
        )
        .unwrap();
    container.refresh().await.unwrap();

    assert!(container.contains_bean("extraRepository"));
    assert!(container.get_bean("extraRepository").is_ok());
}

#[tokio::test]
async fn test_discovered_definition_processor_executes() {
    let container = container_with_repository();
    let introspector = container.introspector();
    introspector.register_constructor(
        "it::PrototypeAdjuster",
        constructor_of(|| PrototypeAdjuster {
            target: "userRepository".to_string(),
        }),
    );
    introspector.register_definition_processor_caster(
        "it::PrototypeAdjuster",
        definition_processor_caster_of::<PrototypeAdjuster>(),
    );
    container
        .register(
            BeanDescriptor::new("prototypeAdjuster").with_type_ref("it::PrototypeAdjuster"),
        )
        .unwrap();
    container.refresh().await.unwrap();

    assert!(!container.is_singleton("userRepository").unwrap());
}

#[tokio::test]
async fn test_stats_and_type_lookup() {
    let container = container_with_repository();
    container.refresh().await.unwrap();

    let stats = container.stats();
    assert!(stats.active);
    assert!(stats.startup_time.is_some());
    assert_eq!(stats.definition_count, 1);
    assert_eq!(stats.singleton_count, 1);

    assert_eq!(
        container.get_type("userRepository").unwrap().as_deref(),
        Some("it::UserRepository")
    );
    assert!(container.get_type("ghost").is_err());
    assert!(container.is_singleton("userRepository").unwrap());
}
