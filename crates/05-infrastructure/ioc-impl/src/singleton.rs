//! 三级缓存单例注册表实现
//!
//! 成品层、早期引用层、工厂层共用一把互斥锁。创建中集合记录
//! 持有线程：同一线程重入判定为循环创建，不同线程在条件变量上
//! 等待创建完成后重查成品层。

use ioc_abstractions::singleton::{
    BeanInstance, ObjectSupplier, SingletonCreator, SingletonEntry, SingletonRegistry,
};
use ioc_common::{CreationError, CreationResult};
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::thread::{self, ThreadId};
use tracing::{debug, warn};

#[derive(Default)]
struct TierState {
    finished: HashMap<String, SingletonEntry>,
    early: HashMap<String, BeanInstance>,
    factories: HashMap<String, ObjectSupplier>,
    creating: HashMap<String, ThreadId>,
}

/// 三级缓存单例注册表
pub struct TieredSingletonRegistry {
    inner: Mutex<TierState>,
    creation_done: Condvar,
}

impl TieredSingletonRegistry {
    /// 创建空的单例注册表
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TierState::default()),
            creation_done: Condvar::new(),
        }
    }

    fn finished_entry(&self, name: &str) -> Option<SingletonEntry> {
        self.inner.lock().finished.get(name).cloned()
    }

    fn store_finished(&self, name: &str, entry: SingletonEntry) {
        let mut state = self.inner.lock();
        state.early.remove(name);
        state.factories.remove(name);
        state.finished.insert(name.to_string(), entry);
    }
}

impl Default for TieredSingletonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SingletonRegistry for TieredSingletonRegistry {
    fn get_singleton(&self, name: &str) -> Option<SingletonEntry> {
        let mut state = self.inner.lock();

        if let Some(entry) = state.finished.get(name) {
            return Some(entry.clone());
        }

        // 早期引用与工厂层仅对创建中的名称开放
        if !state.creating.contains_key(name) {
            return None;
        }

        if let Some(early) = state.early.get(name) {
            return Some(SingletonEntry::Instance(early.clone()));
        }

        let supplier = state.factories.remove(name)?;
        drop(state);

        // 供应器可能回调注册表，调用期间不持锁
        let early = supplier();

        let mut state = self.inner.lock();
        if let Some(entry) = state.finished.get(name) {
            return Some(entry.clone());
        }
        state.early.insert(name.to_string(), early.clone());
        debug!("Bean '{}' 的早期引用已铸造", name);
        Some(SingletonEntry::Instance(early))
    }

    fn register_singleton(&self, name: &str, instance: Option<BeanInstance>) {
        self.store_finished(name, SingletonEntry::from_option(instance));
        debug!("直接登记成品单例: {}", name);
    }

    fn register_singleton_factory(&self, name: &str, supplier: ObjectSupplier) {
        let mut state = self.inner.lock();
        if state.finished.contains_key(name) {
            return;
        }
        state.early.remove(name);
        state.factories.insert(name.to_string(), supplier);
    }

    fn contains_singleton(&self, name: &str) -> bool {
        self.inner.lock().finished.contains_key(name)
    }

    fn singleton_names(&self) -> Vec<String> {
        self.inner.lock().finished.keys().cloned().collect()
    }

    fn is_currently_in_creation(&self, name: &str) -> bool {
        self.inner.lock().creating.contains_key(name)
    }

    fn mark_creation_start(&self, name: &str) -> CreationResult<()> {
        let current = thread::current().id();
        let mut state = self.inner.lock();

        while let Some(owner) = state.creating.get(name) {
            if *owner == current {
                return Err(CreationError::CyclicCreation {
                    name: name.to_string(),
                });
            }
            // 其他线程正在创建同名单例，等待其完成
            self.creation_done.wait(&mut state);
        }

        state.creating.insert(name.to_string(), current);
        Ok(())
    }

    fn mark_creation_end(&self, name: &str) -> CreationResult<()> {
        let mut state = self.inner.lock();
        if state.creating.remove(name).is_none() {
            return Err(CreationError::illegal_state(format!(
                "Bean '{name}' 不在创建中，无法结束创建标记"
            )));
        }
        self.creation_done.notify_all();
        Ok(())
    }

    fn promote_to_finished(&self, name: &str, instance: Option<BeanInstance>) {
        self.store_finished(name, SingletonEntry::from_option(instance));
        debug!("Bean '{}' 已提升至成品层", name);
    }

    fn get_or_create<'a>(
        &'a self,
        name: &str,
        creator: SingletonCreator<'a>,
    ) -> CreationResult<SingletonEntry> {
        if let Some(entry) = self.finished_entry(name) {
            return Ok(entry);
        }

        self.mark_creation_start(name)?;

        // 等待期间其他线程可能已完成创建
        if let Some(entry) = self.finished_entry(name) {
            self.mark_creation_end(name)?;
            return Ok(entry);
        }

        debug!("开始创建单例 Bean: {}", name);
        match creator() {
            Ok(instance) => {
                let entry = SingletonEntry::from_option(instance);
                self.promote_to_finished(name, entry.instance());
                self.mark_creation_end(name)?;
                Ok(entry)
            }
            Err(error) => {
                warn!("单例 Bean '{}' 创建失败: {}", name, error);
                let _ = self.mark_creation_end(name);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_get_or_create_caches_instance() {
        let registry = TieredSingletonRegistry::new();
        let calls = AtomicUsize::new(0);

        let first = registry
            .get_or_create(
                "sample",
                Box::new(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(Arc::new(42u32) as BeanInstance))
                }),
            )
            .unwrap();
        let second = registry
            .get_or_create(
                "sample",
                Box::new(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(Arc::new(43u32) as BeanInstance))
                }),
            )
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let first = first.instance().unwrap();
        let second = second.instance().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_null_result_is_cached_as_sentinel() {
        let registry = TieredSingletonRegistry::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let entry = registry
                .get_or_create(
                    "empty",
                    Box::new(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(None)
                    }),
                )
                .unwrap();
            assert!(entry.is_null());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.contains_singleton("empty"));
    }

    #[test]
    fn test_reentrant_creation_reports_cycle() {
        let registry = TieredSingletonRegistry::new();
        registry.mark_creation_start("a").unwrap();

        let error = registry.mark_creation_start("a").unwrap_err();
        assert!(matches!(error, CreationError::CyclicCreation { .. }));

        registry.mark_creation_end("a").unwrap();
        assert!(!registry.is_currently_in_creation("a"));
    }

    #[test]
    fn test_creation_end_without_start_is_illegal() {
        let registry = TieredSingletonRegistry::new();
        let error = registry.mark_creation_end("ghost").unwrap_err();
        assert!(matches!(error, CreationError::IllegalState { .. }));
    }

    #[test]
    fn test_factory_tier_only_visible_during_creation() {
        let registry = TieredSingletonRegistry::new();
        let instance: BeanInstance = Arc::new(7u32);
        let supplier_calls = Arc::new(AtomicUsize::new(0));

        let captured = instance.clone();
        let counter = supplier_calls.clone();
        registry.register_singleton_factory(
            "a",
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                captured
            }),
        );

        // 创建尚未开始时工厂层不可见
        assert!(registry.get_singleton("a").is_none());

        registry.mark_creation_start("a").unwrap();
        let early = registry.get_singleton("a").unwrap().instance().unwrap();
        assert!(Arc::ptr_eq(&early, &instance));

        // 第二次命中早期引用层，供应器只被调用一次
        let again = registry.get_singleton("a").unwrap().instance().unwrap();
        assert!(Arc::ptr_eq(&again, &instance));
        assert_eq!(supplier_calls.load(Ordering::SeqCst), 1);

        registry.promote_to_finished("a", Some(instance.clone()));
        registry.mark_creation_end("a").unwrap();
        assert!(registry.contains_singleton("a"));
    }

    #[test]
    fn test_failed_creation_clears_creating_mark() {
        let registry = TieredSingletonRegistry::new();

        let error = registry
            .get_or_create(
                "broken",
                Box::new(|| Err(CreationError::illegal_state("构造失败"))),
            )
            .unwrap_err();
        assert!(matches!(error, CreationError::IllegalState { .. }));
        assert!(!registry.is_currently_in_creation("broken"));
        assert!(!registry.contains_singleton("broken"));
    }

    #[test]
    fn test_concurrent_creation_yields_single_instance() {
        let registry = Arc::new(TieredSingletonRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                let calls = calls.clone();
                std::thread::spawn(move || {
                    let entry = registry
                        .get_or_create(
                            "shared",
                            Box::new(move || {
                                calls.fetch_add(1, Ordering::SeqCst);
                                std::thread::sleep(std::time::Duration::from_millis(10));
                                Ok(Some(Arc::new(1u32) as BeanInstance))
                            }),
                        )
                        .unwrap();
                    entry.instance().unwrap()
                })
            })
            .collect();

        let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    }
}
