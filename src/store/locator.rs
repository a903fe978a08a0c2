use std::fmt::Debug;
use std::sync::Arc;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::HashStore;

/// Holds the application's shared store once it has been set up.
///
/// Constructed by the application and passed to every [`StoreLocator`]
/// explicitly; nothing reaches it through global state.
#[derive(Default)]
pub struct StoreRegistry {
    store: OnceLock<Arc<dyn HashStore>>,
}

impl Debug for StoreRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("initialized", &self.store.get().is_some())
            .finish()
    }
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the shared store. Only the first call succeeds.
    pub fn install(&self, store: Arc<dyn HashStore>) -> Result<()> {
        self.store.set(store).map_err(|_| {
            CacheError::InvalidConfiguration("store registry is already initialized".into())
        })
    }

    pub fn get(&self) -> Result<Arc<dyn HashStore>> {
        self.store
            .get()
            .cloned()
            .ok_or(CacheError::RegistryUninitialized)
    }
}

/// Lazily resolves and memoizes one region's store handle.
///
/// Two callers resolving for the first time at once may both hit the
/// registry; they get the same shared store either way.
pub struct StoreLocator {
    registry: Arc<StoreRegistry>,
    resolved: OnceLock<Arc<dyn HashStore>>,
}

impl Debug for StoreLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreLocator")
            .field("registry", &self.registry)
            .field("resolved", &self.resolved.get().is_some())
            .finish()
    }
}

impl StoreLocator {
    pub fn new(registry: Arc<StoreRegistry>) -> Self {
        Self {
            registry,
            resolved: OnceLock::new(),
        }
    }

    /// A locator over a registry that already holds `store`.
    pub fn ready(store: Arc<dyn HashStore>) -> Self {
        let registry = StoreRegistry::new();
        let _ = registry.store.set(store);
        Self::new(Arc::new(registry))
    }

    pub fn resolve(&self) -> Result<Arc<dyn HashStore>> {
        if let Some(store) = self.resolved.get() {
            return Ok(store.clone());
        }

        let store = self.registry.get()?;
        debug!("resolved store handle");
        Ok(self.resolved.get_or_init(|| store).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn resolve_fails_until_registry_is_installed() {
        let registry = Arc::new(StoreRegistry::new());
        let locator = StoreLocator::new(registry.clone());

        assert!(matches!(
            locator.resolve(),
            Err(CacheError::RegistryUninitialized)
        ));

        registry.install(Arc::new(MemoryStore::new())).unwrap();
        assert!(locator.resolve().is_ok());
    }

    #[test]
    fn resolve_returns_the_same_shared_store() {
        let store: Arc<dyn HashStore> = Arc::new(MemoryStore::new());
        let registry = Arc::new(StoreRegistry::new());
        registry.install(store.clone()).unwrap();

        let a = StoreLocator::new(registry.clone());
        let b = StoreLocator::new(registry);

        assert!(Arc::ptr_eq(&a.resolve().unwrap(), &store));
        assert!(Arc::ptr_eq(&a.resolve().unwrap(), &b.resolve().unwrap()));
    }

    #[test]
    fn second_install_is_rejected() {
        let registry = StoreRegistry::new();
        registry.install(Arc::new(MemoryStore::new())).unwrap();

        assert!(matches!(
            registry.install(Arc::new(MemoryStore::new())),
            Err(CacheError::InvalidConfiguration(_))
        ));
    }
}
