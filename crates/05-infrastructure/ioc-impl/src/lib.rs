//! IoC 容器核心实现
//!
//! 提供抽象层各接口的默认实现：
//!
//! - [`DefaultDefinitionRegistry`]: 保序的 Bean 定义注册表
//! - [`TieredSingletonRegistry`]: 三级缓存单例注册表
//! - [`DefaultInstanceCreator`]: 按构造路径分派的实例创建器
//! - [`RegistrationIntrospector`]: 编译期注册式类型内省
//! - [`IocContainer`]: 容器门面，编排刷新流程

pub mod container;
pub mod creator;
pub mod introspector;
pub mod registry;
pub mod singleton;

pub use container::{IocContainer, IocContainerBuilder};
pub use creator::DefaultInstanceCreator;
pub use introspector::RegistrationIntrospector;
pub use registry::DefaultDefinitionRegistry;
pub use singleton::TieredSingletonRegistry;
