//! 编译期注册式类型内省器

use dashmap::DashMap;
use ioc_abstractions::introspector::{
    ConstructorFn, DefinitionProcessorCaster, InstanceMethodFn, RegistryProcessorCaster,
    StaticMethodFn, TypeIntrospector,
};
use ioc_abstractions::processor::{DefinitionPostProcessor, RegistryPostProcessor};
use ioc_abstractions::singleton::BeanInstance;
use std::collections::HashMap;
use std::sync::Arc;

/// 单个类型已登记的全部能力
#[derive(Default)]
struct TypeRegistration {
    constructor: Option<ConstructorFn>,
    static_methods: HashMap<(String, usize), StaticMethodFn>,
    methods: HashMap<(String, usize), InstanceMethodFn>,
}

/// 注册式类型内省器
///
/// 类型名、方法名与参数个数构成查找键，查找为精确匹配。
/// 并发映射允许注册与查找交错进行。
pub struct RegistrationIntrospector {
    types: DashMap<String, TypeRegistration>,
    registry_processor_casters: DashMap<String, RegistryProcessorCaster>,
    definition_processor_casters: DashMap<String, DefinitionProcessorCaster>,
}

impl RegistrationIntrospector {
    /// 创建空的内省器
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
            registry_processor_casters: DashMap::new(),
            definition_processor_casters: DashMap::new(),
        }
    }
}

impl Default for RegistrationIntrospector {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeIntrospector for RegistrationIntrospector {
    fn register_constructor(&self, type_name: &str, constructor: ConstructorFn) {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .constructor = Some(constructor);
    }

    fn register_static_method(
        &self,
        type_name: &str,
        method_name: &str,
        arity: usize,
        method: StaticMethodFn,
    ) {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .static_methods
            .insert((method_name.to_string(), arity), method);
    }

    fn register_method(
        &self,
        type_name: &str,
        method_name: &str,
        arity: usize,
        method: InstanceMethodFn,
    ) {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .methods
            .insert((method_name.to_string(), arity), method);
    }

    fn find_constructor(&self, type_name: &str) -> Option<ConstructorFn> {
        self.types
            .get(type_name)
            .and_then(|registration| registration.constructor.clone())
    }

    fn find_static_method(
        &self,
        type_name: &str,
        method_name: &str,
        arity: usize,
    ) -> Option<StaticMethodFn> {
        self.types.get(type_name).and_then(|registration| {
            registration
                .static_methods
                .get(&(method_name.to_string(), arity))
                .cloned()
        })
    }

    fn find_method(
        &self,
        type_name: &str,
        method_name: &str,
        arity: usize,
    ) -> Option<InstanceMethodFn> {
        self.types.get(type_name).and_then(|registration| {
            registration
                .methods
                .get(&(method_name.to_string(), arity))
                .cloned()
        })
    }

    fn has_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
            || self.registry_processor_casters.contains_key(type_name)
            || self.definition_processor_casters.contains_key(type_name)
    }

    fn register_registry_processor_caster(&self, type_name: &str, caster: RegistryProcessorCaster) {
        self.registry_processor_casters
            .insert(type_name.to_string(), caster);
    }

    fn register_definition_processor_caster(
        &self,
        type_name: &str,
        caster: DefinitionProcessorCaster,
    ) {
        self.definition_processor_casters
            .insert(type_name.to_string(), caster);
    }

    fn has_registry_processor_caster(&self, type_name: &str) -> bool {
        self.registry_processor_casters.contains_key(type_name)
    }

    fn has_definition_processor_caster(&self, type_name: &str) -> bool {
        self.definition_processor_casters.contains_key(type_name)
    }

    fn cast_registry_processor(
        &self,
        type_name: &str,
        instance: &BeanInstance,
    ) -> Option<Arc<dyn RegistryPostProcessor>> {
        self.registry_processor_casters
            .get(type_name)
            .and_then(|caster| caster(instance))
    }

    fn cast_definition_processor(
        &self,
        type_name: &str,
        instance: &BeanInstance,
    ) -> Option<Arc<dyn DefinitionPostProcessor>> {
        self.definition_processor_casters
            .get(type_name)
            .and_then(|caster| caster(instance))
    }
}
