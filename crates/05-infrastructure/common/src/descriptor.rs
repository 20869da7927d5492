//! Bean 定义模型
//!
//! 提供命名组件的构造配方，容器据此创建实例

use crate::errors::{RegistryError, RegistryResult};
use crate::metadata::MarkerMetadata;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Bean 作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeanScope {
    /// 单例：容器内共享同一实例
    Singleton,
    /// 原型：每次获取都创建新实例
    Prototype,
}

impl Default for BeanScope {
    fn default() -> Self {
        Self::Singleton
    }
}

impl BeanScope {
    /// 获取作用域的字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Prototype => "prototype",
        }
    }

    /// 从字符串解析作用域，未知取值返回 `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "singleton" => Some(Self::Singleton),
            "prototype" => Some(Self::Prototype),
            _ => None,
        }
    }
}

/// Bean 的构造路径
///
/// 每个定义必须且只能命中其中一条
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionPath {
    /// 无参构造函数
    DefaultConstructor,
    /// 静态工厂方法（方法定义在 `type_ref` 指向的类型上）
    StaticFactory,
    /// 实例工厂方法（方法定义在另一个 Bean 的实例上）
    InstanceFactory,
}

/// Bean 定义
///
/// 一个命名组件的完整构造配方。由配置管道或调用方直接注册，
/// 在注册表冻结前可被后置处理器修改，冻结后不可变。
#[derive(Debug, Clone)]
pub struct BeanDescriptor {
    /// Bean 名称，注册表中的唯一键
    pub name: String,
    /// 类型名引用，延迟解析
    pub type_ref: Option<String>,
    /// 作用域
    pub scope: BeanScope,
    /// 是否延迟初始化
    pub lazy: bool,
    /// 是否为抽象定义（不参与预实例化）
    pub is_abstract: bool,
    /// 是否为同类型候选中的首选
    pub primary: bool,
    /// 实例工厂 Bean 的名称
    pub factory_owner_name: Option<String>,
    /// 工厂方法名称
    pub factory_method_name: Option<String>,
    /// 初始化回调方法名称
    pub init_hook_name: Option<String>,
    /// 销毁回调方法名称
    pub destroy_hook_name: Option<String>,
    /// 是否作为自动装配候选
    pub autowire_candidate: bool,
    /// 来源标记元数据，仅注解派生的定义携带
    pub source_metadata: Option<Arc<MarkerMetadata>>,
}

impl BeanDescriptor {
    /// 创建新的 Bean 定义
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: None,
            scope: BeanScope::default(),
            lazy: false,
            is_abstract: false,
            primary: false,
            factory_owner_name: None,
            factory_method_name: None,
            init_hook_name: None,
            destroy_hook_name: None,
            autowire_candidate: true,
            source_metadata: None,
        }
    }

    /// 设置类型名引用
    pub fn with_type_ref(mut self, type_ref: impl Into<String>) -> Self {
        self.type_ref = Some(type_ref.into());
        self
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: BeanScope) -> Self {
        self.scope = scope;
        self
    }

    /// 设置延迟初始化
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// 设置抽象标记
    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    /// 设置首选标记
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    /// 设置实例工厂 Bean 名称
    pub fn with_factory_owner(mut self, owner: impl Into<String>) -> Self {
        self.factory_owner_name = Some(owner.into());
        self
    }

    /// 设置工厂方法名称
    pub fn with_factory_method(mut self, method: impl Into<String>) -> Self {
        self.factory_method_name = Some(method.into());
        self
    }

    /// 设置初始化回调方法名称
    pub fn with_init_hook(mut self, method: impl Into<String>) -> Self {
        self.init_hook_name = Some(method.into());
        self
    }

    /// 设置销毁回调方法名称
    pub fn with_destroy_hook(mut self, method: impl Into<String>) -> Self {
        self.destroy_hook_name = Some(method.into());
        self
    }

    /// 设置自动装配候选标记
    pub fn with_autowire_candidate(mut self, candidate: bool) -> Self {
        self.autowire_candidate = candidate;
        self
    }

    /// 附加来源标记元数据
    pub fn with_source_metadata(mut self, metadata: Arc<MarkerMetadata>) -> Self {
        self.source_metadata = Some(metadata);
        self
    }

    /// 是否为单例作用域
    pub fn is_singleton(&self) -> bool {
        self.scope == BeanScope::Singleton
    }

    /// 是否为原型作用域
    pub fn is_prototype(&self) -> bool {
        self.scope == BeanScope::Prototype
    }

    /// 判定该定义命中的构造路径
    ///
    /// 调用前应先通过 [`BeanDescriptor::validate`] 校验
    pub fn construction_path(&self) -> ConstructionPath {
        match (&self.factory_owner_name, &self.factory_method_name) {
            (Some(_), _) => ConstructionPath::InstanceFactory,
            (None, Some(_)) => ConstructionPath::StaticFactory,
            (None, None) => ConstructionPath::DefaultConstructor,
        }
    }

    /// 校验构造路径约束
    ///
    /// 三条构造路径必须恰好命中一条：工厂 Bean 名称与工厂方法名称
    /// 不允许残缺组合，静态工厂方法必须指定工厂类型。
    pub fn validate(&self) -> RegistryResult<()> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidName {
                message: "Bean 名称不能为空".to_string(),
            });
        }
        if self.factory_owner_name.is_some() && self.factory_method_name.is_none() {
            return Err(RegistryError::InvalidDescriptor {
                name: self.name.clone(),
                message: "指定了工厂 Bean 但缺少工厂方法名称".to_string(),
            });
        }
        if self.factory_method_name.is_some()
            && self.factory_owner_name.is_none()
            && self.type_ref.is_none()
        {
            return Err(RegistryError::InvalidDescriptor {
                name: self.name.clone(),
                message: "静态工厂方法缺少工厂类型".to_string(),
            });
        }
        Ok(())
    }
}
