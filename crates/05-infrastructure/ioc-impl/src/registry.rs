//! 保序的 Bean 定义注册表实现

use ioc_abstractions::registry::DefinitionRegistry;
use ioc_common::{BeanDescriptor, RegistryError, RegistryResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// 注册表内部状态
///
/// `names` 维护注册顺序，`definitions` 按名称索引。
/// 覆盖只替换 `definitions` 中的条目，不触碰 `names`。
#[derive(Default)]
struct RegistryState {
    definitions: HashMap<String, BeanDescriptor>,
    names: Vec<String>,
    frozen: bool,
    allow_override: bool,
}

/// 默认 Bean 定义注册表
///
/// 读写锁保护内部状态，每次方法调用持锁时间覆盖单次操作，
/// 不跨越任何等待点。
pub struct DefaultDefinitionRegistry {
    inner: RwLock<RegistryState>,
}

impl DefaultDefinitionRegistry {
    /// 创建新的注册表，默认允许覆盖
    pub fn new() -> Self {
        Self::with_override_policy(true)
    }

    /// 按指定覆盖策略创建注册表
    pub fn with_override_policy(allow_override: bool) -> Self {
        Self {
            inner: RwLock::new(RegistryState {
                allow_override,
                ..RegistryState::default()
            }),
        }
    }
}

impl Default for DefaultDefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionRegistry for DefaultDefinitionRegistry {
    fn register(&self, descriptor: BeanDescriptor) -> RegistryResult<()> {
        descriptor.validate()?;

        let name = descriptor.name.clone();
        let mut state = self.inner.write();

        if state.frozen {
            return Err(RegistryError::Frozen { name });
        }

        if state.definitions.contains_key(&name) {
            if !state.allow_override {
                return Err(RegistryError::DuplicateDefinition { name });
            }
            warn!("覆盖已存在的 Bean 定义: {}", name);
            state.definitions.insert(name, descriptor);
        } else {
            debug!("注册 Bean 定义: {}", name);
            state.names.push(name.clone());
            state.definitions.insert(name, descriptor);
        }

        Ok(())
    }

    fn get(&self, name: &str) -> RegistryResult<BeanDescriptor> {
        let state = self.inner.read();
        state
            .definitions
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(name))
    }

    fn contains(&self, name: &str) -> bool {
        self.inner.read().definitions.contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        self.inner.read().names.clone()
    }

    fn count(&self) -> usize {
        self.inner.read().definitions.len()
    }

    fn remove(&self, name: &str) -> RegistryResult<BeanDescriptor> {
        let mut state = self.inner.write();

        if state.frozen {
            return Err(RegistryError::Frozen {
                name: name.to_string(),
            });
        }

        let descriptor = state
            .definitions
            .remove(name)
            .ok_or_else(|| RegistryError::not_found(name))?;
        state.names.retain(|existing| existing != name);
        debug!("移除 Bean 定义: {}", name);

        Ok(descriptor)
    }

    fn freeze(&self) {
        let mut state = self.inner.write();
        state.frozen = true;
        info!("Bean 定义注册表已冻结, 共 {} 个定义", state.definitions.len());
    }

    fn is_frozen(&self) -> bool {
        self.inner.read().frozen
    }

    fn allow_override(&self) -> bool {
        self.inner.read().allow_override
    }

    fn set_allow_override(&self, allow: bool) {
        self.inner.write().allow_override = allow;
    }
}
