//! Response Store Module
//!
//! The persistent key→response abstraction behind the cache manager, plus
//! the in-memory implementation used by the gateway.
//!
//! Stores are named generations: `cache-v1`, `cache-v2`, `meta-v1`, and so
//! on. Activation deletes whole generations by name; individual entries are
//! only ever touched through atomic per-key operations.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{CacheError, Result};
use crate::store::CachedResponse;

// == Response Store Trait ==
/// Transactional key-value store for captured responses, scoped by store
/// name. Implementations must make each method atomic with respect to
/// concurrent callers.
pub trait ResponseStore: Send + Sync + 'static {
    /// Inserts or overwrites an entry, creating the named store on first use.
    fn put(&self, store: &str, key: &str, response: CachedResponse) -> Result<()>;

    /// Returns a copy of the entry, or None if the store or key is absent.
    fn lookup(&self, store: &str, key: &str) -> Result<Option<CachedResponse>>;

    /// Removes an entry; returns whether it existed.
    fn delete(&self, store: &str, key: &str) -> Result<bool>;

    /// Lists the keys of a named store.
    fn keys(&self, store: &str) -> Result<Vec<String>>;

    /// Lists all store names, across generations.
    fn store_names(&self) -> Result<Vec<String>>;

    /// Deletes a whole named store; returns whether it existed.
    fn delete_store(&self, store: &str) -> Result<bool>;

    /// Number of entries in a named store (0 if absent).
    fn entry_count(&self, store: &str) -> Result<usize>;
}

// == In-Memory Store ==
/// HashMap-of-HashMaps store guarded by a single RwLock.
///
/// Lock scopes are confined to each method, so holding a reference across
/// await points is impossible by construction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    stores: RwLock<HashMap<String, HashMap<String, CachedResponse>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, HashMap<String, CachedResponse>>>>
    {
        self.stores
            .read()
            .map_err(|_| CacheError::Store("store lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, HashMap<String, CachedResponse>>>>
    {
        self.stores
            .write()
            .map_err(|_| CacheError::Store("store lock poisoned".to_string()))
    }
}

impl ResponseStore for MemoryStore {
    fn put(&self, store: &str, key: &str, response: CachedResponse) -> Result<()> {
        let mut stores = self.write()?;
        stores
            .entry(store.to_string())
            .or_default()
            .insert(key.to_string(), response);
        Ok(())
    }

    fn lookup(&self, store: &str, key: &str) -> Result<Option<CachedResponse>> {
        let stores = self.read()?;
        Ok(stores.get(store).and_then(|s| s.get(key)).cloned())
    }

    fn delete(&self, store: &str, key: &str) -> Result<bool> {
        let mut stores = self.write()?;
        Ok(stores
            .get_mut(store)
            .map(|s| s.remove(key).is_some())
            .unwrap_or(false))
    }

    fn keys(&self, store: &str) -> Result<Vec<String>> {
        let stores = self.read()?;
        Ok(stores
            .get(store)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn store_names(&self) -> Result<Vec<String>> {
        let stores = self.read()?;
        Ok(stores.keys().cloned().collect())
    }

    fn delete_store(&self, store: &str) -> Result<bool> {
        let mut stores = self.write()?;
        Ok(stores.remove(store).is_some())
    }

    fn entry_count(&self, store: &str) -> Result<usize> {
        let stores = self.read()?;
        Ok(stores.get(store).map(|s| s.len()).unwrap_or(0))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn resp(body: &str) -> CachedResponse {
        CachedResponse::new(200, vec![], body.to_string())
    }

    #[test]
    fn test_put_and_lookup() {
        let store = MemoryStore::new();

        store.put("cache-v1", "GET /a", resp("hello")).unwrap();
        let found = store.lookup("cache-v1", "GET /a").unwrap().unwrap();

        assert_eq!(found.body.as_ref(), b"hello");
        assert_eq!(store.entry_count("cache-v1").unwrap(), 1);
    }

    #[test]
    fn test_lookup_missing_store_and_key() {
        let store = MemoryStore::new();

        assert!(store.lookup("cache-v1", "GET /a").unwrap().is_none());

        store.put("cache-v1", "GET /a", resp("x")).unwrap();
        assert!(store.lookup("cache-v1", "GET /b").unwrap().is_none());
        assert!(store.lookup("cache-v2", "GET /a").unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let store = MemoryStore::new();

        store.put("cache-v1", "GET /a", resp("v1")).unwrap();
        store.put("cache-v1", "GET /a", resp("v2")).unwrap();

        let found = store.lookup("cache-v1", "GET /a").unwrap().unwrap();
        assert_eq!(found.body.as_ref(), b"v2");
        assert_eq!(store.entry_count("cache-v1").unwrap(), 1);
    }

    #[test]
    fn test_delete_entry() {
        let store = MemoryStore::new();

        store.put("cache-v1", "GET /a", resp("x")).unwrap();
        assert!(store.delete("cache-v1", "GET /a").unwrap());
        assert!(!store.delete("cache-v1", "GET /a").unwrap());
        assert!(store.lookup("cache-v1", "GET /a").unwrap().is_none());
    }

    #[test]
    fn test_store_names_and_delete_store() {
        let store = MemoryStore::new();

        store.put("cache-v1", "GET /a", resp("x")).unwrap();
        store.put("cache-v2", "GET /a", resp("y")).unwrap();
        store.put("meta-v1", "GET /a", resp("m")).unwrap();

        let mut names = store.store_names().unwrap();
        names.sort();
        assert_eq!(names, vec!["cache-v1", "cache-v2", "meta-v1"]);

        assert!(store.delete_store("cache-v1").unwrap());
        assert!(!store.delete_store("cache-v1").unwrap());
        assert!(store.lookup("cache-v1", "GET /a").unwrap().is_none());

        // Other generations are untouched
        assert!(store.lookup("cache-v2", "GET /a").unwrap().is_some());
    }

    #[test]
    fn test_keys_listing() {
        let store = MemoryStore::new();

        assert!(store.keys("cache-v1").unwrap().is_empty());

        store.put("cache-v1", "GET /a", resp("x")).unwrap();
        store.put("cache-v1", "GET /b", resp("y")).unwrap();

        let mut keys = store.keys("cache-v1").unwrap();
        keys.sort();
        assert_eq!(keys, vec!["GET /a", "GET /b"]);
    }
}
