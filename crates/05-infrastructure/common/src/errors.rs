//! 错误类型定义

use thiserror::Error;

/// 定义注册表错误类型
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("无效的 Bean 名称: {message}")]
    InvalidName { message: String },

    #[error("无效的 Bean 定义: {name}, 原因: {message}")]
    InvalidDescriptor { name: String, message: String },

    #[error("无法覆盖已存在的 Bean 定义: {name}")]
    DuplicateDefinition { name: String },

    #[error("注册表配置已冻结, 无法修改 Bean 定义: {name}")]
    Frozen { name: String },

    #[error("未找到 Bean 定义: {name}")]
    NotFound { name: String },
}

impl RegistryError {
    /// 创建无效名称错误
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::InvalidName {
            message: message.into(),
        }
    }

    /// 创建未找到定义错误
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// Bean 创建错误类型
#[derive(Error, Debug)]
pub enum CreationError {
    #[error("检测到循环创建: Bean '{name}' 已经在创建中")]
    CyclicCreation { name: String },

    #[error("非法状态: {message}")]
    IllegalState { message: String },

    #[error("Bean 实例化失败: {name}, 原因: {source}")]
    Instantiation {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("工厂 Bean 名称不能与目标 Bean 名称相同: {name}")]
    SelfReferentialFactory { name: String },

    #[error("在类型 [{type_name}] 中找不到工厂方法 [{method_name}]")]
    FactoryMethodNotFound {
        type_name: String,
        method_name: String,
    },

    #[error("静态工厂方法 Bean [{name}] 没有指定工厂类型")]
    NoFactoryClass { name: String },

    #[error("类型 [{type_name}] 没有可用的无参构造函数")]
    NoDefaultConstructor { type_name: String },

    #[error("Bean 工厂方法返回了空实例: {name}")]
    NullInstance { name: String },

    #[error("Bean 类型不匹配: {name}, 期望类型: {expected}")]
    TypeMismatch { name: String, expected: String },
}

impl CreationError {
    /// 创建实例化失败错误
    pub fn instantiation(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Instantiation {
            name: name.into(),
            source: source.into(),
        }
    }

    /// 创建非法状态错误
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }
}

/// 配置处理错误类型
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("组件扫描失败: {message}")]
    ScanFailure { message: String },

    #[error("注册表后置处理失败: {source}")]
    PostProcessing {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConfigurationError {
    /// 创建扫描失败错误
    pub fn scan_failure(message: impl Into<String>) -> Self {
        Self::ScanFailure {
            message: message.into(),
        }
    }

    /// 创建后置处理失败错误
    pub fn post_processing(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::PostProcessing {
            source: source.into(),
        }
    }
}

/// 容器错误类型
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("注册表错误: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },

    #[error("Bean 创建错误: {source}")]
    Creation {
        #[from]
        source: CreationError,
    },

    #[error("配置处理错误: {source}")]
    Configuration {
        #[from]
        source: ConfigurationError,
    },

    #[error("容器刷新失败: {message}")]
    RefreshFailed { message: String },
}

/// 结果类型别名
pub type RegistryResult<T> = Result<T, RegistryError>;
pub type CreationResult<T> = Result<T, CreationError>;
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
pub type ContainerResult<T> = Result<T, ContainerError>;
