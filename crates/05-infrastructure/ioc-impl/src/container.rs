//! IoC 容器门面实现
//!
//! 编排刷新流程：后置处理器执行、注册表冻结、单例预实例化。
//! 刷新失败时容器转入非活动状态，不发布部分成功的结果。

use crate::creator::DefaultInstanceCreator;
use crate::introspector::RegistrationIntrospector;
use crate::registry::DefaultDefinitionRegistry;
use crate::singleton::TieredSingletonRegistry;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ioc_abstractions::container::{BeanContainer, ContainerConfig, ContainerStats};
use ioc_abstractions::creator::{BeanResolver, InstanceCreator};
use ioc_abstractions::introspector::TypeIntrospector;
use ioc_abstractions::processor::{DefinitionPostProcessor, RegistryPostProcessor};
use ioc_abstractions::registry::DefinitionRegistry;
use ioc_abstractions::singleton::{BeanInstance, SingletonEntry, SingletonRegistry};
use ioc_common::{
    BeanDescriptor, ConfigurationError, ContainerError, ContainerResult, CreationError,
    RegistryResult,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// IoC 容器
///
/// 生命周期：构建 -> 注册定义 -> 刷新 -> 获取 Bean。
/// 所有方法以共享引用调用，内部状态自行同步。
pub struct IocContainer {
    id: Uuid,
    config: ContainerConfig,
    definitions: DefaultDefinitionRegistry,
    singletons: TieredSingletonRegistry,
    creator: DefaultInstanceCreator,
    introspector: Arc<dyn TypeIntrospector>,
    registry_processors: Mutex<Vec<Arc<dyn RegistryPostProcessor>>>,
    definition_processors: Mutex<Vec<Arc<dyn DefinitionPostProcessor>>>,
    startup_time: Mutex<Option<DateTime<Utc>>>,
    active: AtomicBool,
}

impl IocContainer {
    /// 以默认配置创建容器
    pub fn new() -> Self {
        IocContainerBuilder::new().build()
    }

    /// 创建容器构建器
    pub fn builder() -> IocContainerBuilder {
        IocContainerBuilder::new()
    }

    /// 容器标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 类型内省器，供调用方登记构造能力
    pub fn introspector(&self) -> Arc<dyn TypeIntrospector> {
        Arc::clone(&self.introspector)
    }

    /// 手工追加注册表后置处理器，优先于发现的处理器执行
    pub fn add_registry_processor(&self, processor: Arc<dyn RegistryPostProcessor>) {
        self.registry_processors.lock().push(processor);
    }

    /// 手工追加定义后置处理器
    pub fn add_definition_processor(&self, processor: Arc<dyn DefinitionPostProcessor>) {
        self.definition_processors.lock().push(processor);
    }

    /// 按名称获取 Bean 并下转型为具体类型
    pub fn get_bean_as<T>(&self, name: &str) -> ContainerResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let instance = self.get_bean(name)?;
        instance.downcast::<T>().map_err(|_| {
            ContainerError::from(CreationError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
        })
    }

    fn prepare_refresh(&self) {
        *self.startup_time.lock() = Some(Utc::now());
        self.active.store(true, Ordering::SeqCst);
        info!(
            "容器 [{}] 准备刷新, 当前定义数: {}",
            self.id,
            self.definitions.count()
        );
    }

    async fn do_refresh(&self) -> ContainerResult<()> {
        self.invoke_post_processors().await?;
        self.definitions.freeze();
        if self.config.eager_singleton_init {
            self.pre_instantiate_singletons()?;
            info!(
                "预实例化完成, 共 {} 个成品单例",
                self.singletons.singleton_names().len()
            );
        }
        Ok(())
    }

    /// 两阶段编排：先执行全部注册表后置处理器，再执行定义后置
    /// 处理器。每个阶段内手工注册的先于发现的执行，名称集合
    /// 保证每个处理器至多执行一次。
    async fn invoke_post_processors(&self) -> ContainerResult<()> {
        let mut processed_registry = HashSet::new();
        self.apply_registry_processors(&mut processed_registry)
            .await?;

        let mut processed_definition = HashSet::new();
        self.apply_definition_processors(&mut processed_definition)
            .await?;

        Ok(())
    }

    async fn apply_registry_processors(
        &self,
        processed: &mut HashSet<String>,
    ) -> ContainerResult<()> {
        let manual: Vec<_> = self.registry_processors.lock().clone();
        for processor in manual {
            if processed.insert(processor.name().to_string()) {
                debug!("执行手工注册的注册表后置处理器: {}", processor.name());
                processor.post_process_registry(&self.definitions).await?;
            }
        }

        // 处理器可能注册出新的处理器定义，循环至无新发现
        loop {
            let pending = self.discover_processors(processed, |type_ref| {
                self.introspector.has_registry_processor_caster(type_ref)
            });
            if pending.is_empty() {
                break;
            }

            for (name, type_ref) in pending {
                if !processed.insert(name.clone()) {
                    continue;
                }
                let instance = self
                    .get_bean(&name)
                    .map_err(ConfigurationError::post_processing)?;
                let processor = self
                    .introspector
                    .cast_registry_processor(&type_ref, &instance)
                    .ok_or_else(|| {
                        ConfigurationError::post_processing(CreationError::TypeMismatch {
                            name: name.clone(),
                            expected: "RegistryPostProcessor".to_string(),
                        })
                    })?;
                debug!("执行发现的注册表后置处理器: {}", name);
                processor.post_process_registry(&self.definitions).await?;
            }
        }

        Ok(())
    }

    async fn apply_definition_processors(
        &self,
        processed: &mut HashSet<String>,
    ) -> ContainerResult<()> {
        let manual: Vec<_> = self.definition_processors.lock().clone();
        for processor in manual {
            if processed.insert(processor.name().to_string()) {
                debug!("执行手工注册的定义后置处理器: {}", processor.name());
                processor
                    .post_process_definitions(&self.definitions)
                    .await?;
            }
        }

        let pending = self.discover_processors(processed, |type_ref| {
            self.introspector.has_definition_processor_caster(type_ref)
        });
        for (name, type_ref) in pending {
            if !processed.insert(name.clone()) {
                continue;
            }
            let instance = self
                .get_bean(&name)
                .map_err(ConfigurationError::post_processing)?;
            let processor = self
                .introspector
                .cast_definition_processor(&type_ref, &instance)
                .ok_or_else(|| {
                    ConfigurationError::post_processing(CreationError::TypeMismatch {
                        name: name.clone(),
                        expected: "DefinitionPostProcessor".to_string(),
                    })
                })?;
            debug!("执行发现的定义后置处理器: {}", name);
            processor.post_process_definitions(&self.definitions).await?;
        }

        Ok(())
    }

    fn discover_processors(
        &self,
        processed: &HashSet<String>,
        matches: impl Fn(&str) -> bool,
    ) -> Vec<(String, String)> {
        let mut pending = Vec::new();
        for name in self.definitions.names() {
            if processed.contains(&name) {
                continue;
            }
            let Ok(descriptor) = self.definitions.get(&name) else {
                continue;
            };
            if let Some(type_ref) = descriptor.type_ref.as_deref() {
                if matches(type_ref) {
                    pending.push((name, type_ref.to_string()));
                }
            }
        }
        pending
    }

    /// 预实例化非抽象、非延迟的单例定义
    fn pre_instantiate_singletons(&self) -> ContainerResult<()> {
        for name in self.definitions.names() {
            let descriptor = self.definitions.get(&name)?;
            if descriptor.is_abstract || !descriptor.is_singleton() || descriptor.lazy {
                continue;
            }
            debug!("预实例化单例 Bean: {}", name);
            self.resolve_singleton(&name, &descriptor)?;
        }
        Ok(())
    }

    fn resolve_singleton(
        &self,
        name: &str,
        descriptor: &BeanDescriptor,
    ) -> ContainerResult<SingletonEntry> {
        if let Some(entry) = self.singletons.get_singleton(name) {
            return Ok(entry);
        }
        let descriptor = descriptor.clone();
        let entry = self.singletons.get_or_create(
            name,
            Box::new(move || self.creator.create(&descriptor, None, self)),
        )?;
        Ok(entry)
    }
}

impl Default for IocContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl BeanResolver for IocContainer {
    fn resolve_bean(&self, name: &str) -> ContainerResult<BeanInstance> {
        self.get_bean(name)
    }

    fn resolve_type(&self, name: &str) -> ContainerResult<Option<String>> {
        self.get_type(name)
    }
}

#[async_trait]
impl BeanContainer for IocContainer {
    fn register(&self, descriptor: BeanDescriptor) -> RegistryResult<()> {
        self.definitions.register(descriptor)
    }

    async fn refresh(&self) -> ContainerResult<()> {
        if self.definitions.is_frozen() {
            return Err(ContainerError::RefreshFailed {
                message: "容器已经刷新, 不支持重复刷新".to_string(),
            });
        }

        info!("==================== 开始刷新 IoC 容器 ====================");
        self.prepare_refresh();

        if let Err(refresh_error) = self.do_refresh().await {
            self.active.store(false, Ordering::SeqCst);
            error!("IoC 容器刷新失败: {}", refresh_error);
            return Err(refresh_error);
        }

        info!("==================== IoC 容器刷新完成 ====================");
        Ok(())
    }

    fn get_bean(&self, name: &str) -> ContainerResult<BeanInstance> {
        if let Some(entry) = self.singletons.get_singleton(name) {
            return entry.instance().ok_or_else(|| {
                ContainerError::from(CreationError::NullInstance {
                    name: name.to_string(),
                })
            });
        }

        let descriptor = self.definitions.get(name)?;
        if descriptor.is_singleton() {
            let entry = self.resolve_singleton(name, &descriptor)?;
            entry.instance().ok_or_else(|| {
                ContainerError::from(CreationError::NullInstance {
                    name: name.to_string(),
                })
            })
        } else {
            let instance = self.creator.create(&descriptor, None, self)?;
            instance.ok_or_else(|| {
                ContainerError::from(CreationError::NullInstance {
                    name: name.to_string(),
                })
            })
        }
    }

    fn contains_bean(&self, name: &str) -> bool {
        self.definitions.contains(name) || self.singletons.contains_singleton(name)
    }

    fn is_singleton(&self, name: &str) -> ContainerResult<bool> {
        match self.definitions.get(name) {
            Ok(descriptor) => Ok(descriptor.is_singleton()),
            Err(_) if self.singletons.contains_singleton(name) => Ok(true),
            Err(not_found) => Err(not_found.into()),
        }
    }

    fn get_type(&self, name: &str) -> ContainerResult<Option<String>> {
        match self.definitions.get(name) {
            Ok(descriptor) => Ok(descriptor.type_ref),
            Err(_) if self.singletons.contains_singleton(name) => Ok(None),
            Err(not_found) => Err(not_found.into()),
        }
    }

    fn stats(&self) -> ContainerStats {
        ContainerStats {
            definition_count: self.definitions.count(),
            singleton_count: self.singletons.singleton_names().len(),
            active: self.active.load(Ordering::SeqCst),
            startup_time: *self.startup_time.lock(),
        }
    }
}

/// IoC 容器构建器
pub struct IocContainerBuilder {
    config: ContainerConfig,
    introspector: Option<Arc<dyn TypeIntrospector>>,
    registry_processors: Vec<Arc<dyn RegistryPostProcessor>>,
    definition_processors: Vec<Arc<dyn DefinitionPostProcessor>>,
}

impl IocContainerBuilder {
    /// 创建构建器
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            introspector: None,
            registry_processors: Vec::new(),
            definition_processors: Vec::new(),
        }
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置类型内省器
    pub fn with_introspector(mut self, introspector: Arc<dyn TypeIntrospector>) -> Self {
        self.introspector = Some(introspector);
        self
    }

    /// 追加手工注册的注册表后置处理器
    pub fn add_registry_processor(mut self, processor: Arc<dyn RegistryPostProcessor>) -> Self {
        self.registry_processors.push(processor);
        self
    }

    /// 追加手工注册的定义后置处理器
    pub fn add_definition_processor(mut self, processor: Arc<dyn DefinitionPostProcessor>) -> Self {
        self.definition_processors.push(processor);
        self
    }

    /// 构建容器
    pub fn build(self) -> IocContainer {
        let introspector = self
            .introspector
            .unwrap_or_else(|| Arc::new(RegistrationIntrospector::new()));

        IocContainer {
            id: Uuid::new_v4(),
            definitions: DefaultDefinitionRegistry::with_override_policy(
                self.config.allow_definition_override,
            ),
            singletons: TieredSingletonRegistry::new(),
            creator: DefaultInstanceCreator::new(Arc::clone(&introspector)),
            introspector,
            registry_processors: Mutex::new(self.registry_processors),
            definition_processors: Mutex::new(self.definition_processors),
            startup_time: Mutex::new(None),
            active: AtomicBool::new(false),
            config: self.config,
        }
    }
}

impl Default for IocContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
