//! 注解风格的容器装配层
//!
//! 以标记元数据驱动的配置管道：组件目录收录候选类型，扫描器
//! 按模块路径发现组件，配置类处理器在容器刷新期间解析配置类
//! 并登记派生的 Bean 定义。
//!
//! - [`ComponentCatalog`]: 候选组件目录
//! - [`CatalogComponentScanner`]: 基于目录的组件扫描器
//! - [`ConfigurationClassPostProcessor`]: 配置类注册表后置处理器
//! - [`AnnotationContainerBuilder`]: 一站式容器装配入口

pub mod annotations;
pub mod builder;
pub mod catalog;
pub mod configuration_class;
pub mod parser;
pub mod post_processor;
pub mod reader;
pub mod scanner;

pub use annotations::{apply_common_attributes, is_configuration_candidate};
pub use builder::AnnotationContainerBuilder;
pub use catalog::{global_catalog, CandidateComponent, ComponentCatalog};
pub use configuration_class::{BeanMethod, ConfigurationClass};
pub use parser::ConfigurationClassParser;
pub use post_processor::ConfigurationClassPostProcessor;
pub use reader::ConfigurationClassReader;
pub use scanner::CatalogComponentScanner;
