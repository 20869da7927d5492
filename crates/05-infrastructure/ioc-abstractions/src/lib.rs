//! # IoC Abstractions
//!
//! 容器能力抽象层，定义 Bean 注册、单例生命周期与实例创建的核心接口。
//!
//! ## 核心接口
//!
//! - [`DefinitionRegistry`] - Bean 定义注册表接口
//! - [`SingletonRegistry`] - 分层单例注册表接口
//! - [`InstanceCreator`] - 实例创建调度接口
//! - [`BeanContainer`] - 容器门面接口
//! - [`RegistryPostProcessor`] / [`DefinitionPostProcessor`] - 后置处理器接口
//! - [`ComponentScanner`] - 组件扫描器接口
//! - [`TypeIntrospector`] - 类型内省能力接口

pub mod container;
pub mod creator;
pub mod introspector;
pub mod processor;
pub mod registry;
pub mod scanner;
pub mod singleton;

pub use container::*;
pub use creator::*;
pub use introspector::*;
pub use processor::*;
pub use registry::*;
pub use scanner::*;
pub use singleton::*;
