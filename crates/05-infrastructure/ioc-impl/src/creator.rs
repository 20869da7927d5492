//! 按构造路径分派的实例创建器

use ioc_abstractions::creator::{BeanResolver, InstanceCreator};
use ioc_abstractions::introspector::TypeIntrospector;
use ioc_abstractions::singleton::BeanInstance;
use ioc_common::{BeanDescriptor, ConstructionPath, CreationError, CreationResult};
use std::sync::Arc;
use tracing::debug;

/// 默认实例创建器
///
/// 依次尝试实例工厂方法、静态工厂方法、无参构造函数，按
/// 内省器中登记的句柄完成调用。
pub struct DefaultInstanceCreator {
    introspector: Arc<dyn TypeIntrospector>,
}

impl DefaultInstanceCreator {
    /// 基于类型内省器创建
    pub fn new(introspector: Arc<dyn TypeIntrospector>) -> Self {
        Self { introspector }
    }

    fn create_by_instance_factory(
        &self,
        descriptor: &BeanDescriptor,
        owner_name: &str,
        method_name: &str,
        args: &[BeanInstance],
        resolver: &dyn BeanResolver,
    ) -> CreationResult<Option<BeanInstance>> {
        if owner_name == descriptor.name {
            return Err(CreationError::SelfReferentialFactory {
                name: descriptor.name.clone(),
            });
        }

        let owner = resolver
            .resolve_bean(owner_name)
            .map_err(|error| CreationError::instantiation(&descriptor.name, error))?;
        let owner_type = resolver
            .resolve_type(owner_name)
            .map_err(|error| CreationError::instantiation(&descriptor.name, error))?
            .ok_or_else(|| {
                CreationError::illegal_state(format!("工厂 Bean '{owner_name}' 未声明类型"))
            })?;

        let method = self
            .introspector
            .find_method(&owner_type, method_name, args.len())
            .ok_or_else(|| CreationError::FactoryMethodNotFound {
                type_name: owner_type.clone(),
                method_name: method_name.to_string(),
            })?;

        debug!(
            "通过实例工厂方法创建 Bean '{}': {}::{}",
            descriptor.name, owner_type, method_name
        );
        method(&owner, args).map_err(|error| CreationError::instantiation(&descriptor.name, error))
    }

    fn create_by_static_factory(
        &self,
        descriptor: &BeanDescriptor,
        method_name: &str,
        args: &[BeanInstance],
    ) -> CreationResult<Option<BeanInstance>> {
        let type_name = descriptor
            .type_ref
            .as_deref()
            .ok_or_else(|| CreationError::NoFactoryClass {
                name: descriptor.name.clone(),
            })?;

        let method = self
            .introspector
            .find_static_method(type_name, method_name, args.len())
            .ok_or_else(|| CreationError::FactoryMethodNotFound {
                type_name: type_name.to_string(),
                method_name: method_name.to_string(),
            })?;

        debug!(
            "通过静态工厂方法创建 Bean '{}': {}::{}",
            descriptor.name, type_name, method_name
        );
        method(args).map_err(|error| CreationError::instantiation(&descriptor.name, error))
    }

    fn create_by_constructor(
        &self,
        descriptor: &BeanDescriptor,
    ) -> CreationResult<Option<BeanInstance>> {
        let type_name =
            descriptor
                .type_ref
                .as_deref()
                .ok_or_else(|| CreationError::NoDefaultConstructor {
                    type_name: descriptor.name.clone(),
                })?;

        let constructor = self.introspector.find_constructor(type_name).ok_or_else(|| {
            CreationError::NoDefaultConstructor {
                type_name: type_name.to_string(),
            }
        })?;

        debug!("通过无参构造函数创建 Bean '{}': {}", descriptor.name, type_name);
        constructor(&[]).map_err(|error| CreationError::instantiation(&descriptor.name, error))
    }
}

impl InstanceCreator for DefaultInstanceCreator {
    fn create(
        &self,
        descriptor: &BeanDescriptor,
        explicit_args: Option<&[BeanInstance]>,
        resolver: &dyn BeanResolver,
    ) -> CreationResult<Option<BeanInstance>> {
        let args = explicit_args.unwrap_or(&[]);

        match descriptor.construction_path() {
            ConstructionPath::InstanceFactory => {
                let owner = descriptor.factory_owner_name.as_deref().unwrap_or_default();
                let method = descriptor
                    .factory_method_name
                    .as_deref()
                    .unwrap_or_default();
                self.create_by_instance_factory(descriptor, owner, method, args, resolver)
            }
            ConstructionPath::StaticFactory => {
                let method = descriptor
                    .factory_method_name
                    .as_deref()
                    .unwrap_or_default();
                self.create_by_static_factory(descriptor, method, args)
            }
            ConstructionPath::DefaultConstructor => self.create_by_constructor(descriptor),
        }
    }
}
