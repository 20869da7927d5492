//! 分层单例注册表抽象接口
//!
//! 同一逻辑单例按名称分布在三个层级：成品层、早期引用层、
//! 工厂层。`creating` 集合跟踪创建中的名称，是循环创建的
//! 检测与破除点。

use ioc_common::CreationResult;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Bean 实例的统一持有形式
pub type BeanInstance = Arc<dyn Any + Send + Sync>;

/// 早期引用供应器，至多被调用一次
pub type ObjectSupplier = Box<dyn FnOnce() -> BeanInstance + Send>;

/// 单例创建闭包
///
/// 可能递归回调同一注册表解析依赖，返回 `None` 表示工厂方法
/// 产出了空实例
pub type SingletonCreator<'a> =
    Box<dyn FnOnce() -> CreationResult<Option<BeanInstance>> + Send + 'a>;

/// 成品层条目
///
/// 空创建结果以 [`SingletonEntry::Null`] 哨兵缓存，保证重复查找
/// 不会再次触发创建
#[derive(Clone)]
pub enum SingletonEntry {
    /// 完整构造的实例
    Instance(BeanInstance),
    /// 空创建结果的哨兵
    Null,
}

impl SingletonEntry {
    /// 从可空实例构造条目
    pub fn from_option(instance: Option<BeanInstance>) -> Self {
        match instance {
            Some(instance) => Self::Instance(instance),
            None => Self::Null,
        }
    }

    /// 取出实例，哨兵返回 `None`
    pub fn instance(&self) -> Option<BeanInstance> {
        match self {
            Self::Instance(instance) => Some(Arc::clone(instance)),
            Self::Null => None,
        }
    }

    /// 是否为空哨兵
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Debug for SingletonEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("SingletonEntry::Instance"),
            Self::Null => f.write_str("SingletonEntry::Null"),
        }
    }
}

/// 分层单例注册表
pub trait SingletonRegistry: Send + Sync {
    /// 查找单例
    ///
    /// 依次检查成品层；若名称正在创建中，再检查早期引用层，
    /// 必要时调用工厂层的供应器铸造早期引用。
    fn get_singleton(&self, name: &str) -> Option<SingletonEntry>;

    /// 直接登记成品单例，清除同名的早期引用与工厂
    fn register_singleton(&self, name: &str, instance: Option<BeanInstance>);

    /// 登记早期引用供应器
    ///
    /// 名称已在成品层时忽略；同名的陈旧早期引用被清除（重新武装）
    fn register_singleton_factory(&self, name: &str, supplier: ObjectSupplier);

    /// 名称是否已有成品单例（含空哨兵）
    fn contains_singleton(&self, name: &str) -> bool;

    /// 成品层名称快照
    fn singleton_names(&self) -> Vec<String>;

    /// 名称是否正在创建中
    fn is_currently_in_creation(&self, name: &str) -> bool;

    /// 标记创建开始，名称已在创建中则报循环创建错误
    fn mark_creation_start(&self, name: &str) -> CreationResult<()>;

    /// 标记创建结束，名称不在创建中则报非法状态错误
    fn mark_creation_end(&self, name: &str) -> CreationResult<()>;

    /// 将名称从所在层级直接提升到成品层
    fn promote_to_finished(&self, name: &str, instance: Option<BeanInstance>);

    /// 组合操作：按需创建单例
    ///
    /// 已有成品直接返回；否则标记创建开始、调用创建闭包、
    /// 成功时提升为成品，无论成败都标记创建结束。
    fn get_or_create<'a>(
        &'a self,
        name: &str,
        creator: SingletonCreator<'a>,
    ) -> CreationResult<SingletonEntry>;
}
