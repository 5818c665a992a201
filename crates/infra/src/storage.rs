//! Keyed in-memory storage.
//!
//! Many concurrent readers, one exclusive writer per key space. Ordered
//! iteration keeps `values()` stable between calls.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use retailsim_core::{DomainError, DomainResult};

/// Key/value store abstraction backing the repositories.
pub trait KeyedStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> DomainResult<Option<V>>;

    /// Insert only if `key` is absent. Returns `false` on a duplicate key.
    fn insert_new(&self, key: K, value: V) -> DomainResult<bool>;

    fn upsert(&self, key: K, value: V) -> DomainResult<()>;

    fn contains(&self, key: &K) -> DomainResult<bool>;

    /// All values in key order.
    fn values(&self) -> DomainResult<Vec<V>>;

    fn len(&self) -> DomainResult<usize>;

    fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<K, V, S> KeyedStore<K, V> for Arc<S>
where
    S: KeyedStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> DomainResult<Option<V>> {
        (**self).get(key)
    }

    fn insert_new(&self, key: K, value: V) -> DomainResult<bool> {
        (**self).insert_new(key, value)
    }

    fn upsert(&self, key: K, value: V) -> DomainResult<()> {
        (**self).upsert(key, value)
    }

    fn contains(&self, key: &K) -> DomainResult<bool> {
        (**self).contains(key)
    }

    fn values(&self) -> DomainResult<Vec<V>> {
        (**self).values()
    }

    fn len(&self) -> DomainResult<usize> {
        (**self).len()
    }
}

/// `RwLock<BTreeMap>` store for tests and the CLI session.
#[derive(Debug)]
pub struct InMemoryKeyedStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
}

impl<K, V> InMemoryKeyedStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryKeyedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> DomainError {
    DomainError::storage("lock poisoned")
}

impl<K, V> KeyedStore<K, V> for InMemoryKeyedStore<K, V>
where
    K: Ord + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> DomainResult<Option<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    fn insert_new(&self, key: K, value: V) -> DomainResult<bool> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.contains_key(&key) {
            return Ok(false);
        }
        map.insert(key, value);
        Ok(true)
    }

    fn upsert(&self, key: K, value: V) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(key, value);
        Ok(())
    }

    fn contains(&self, key: &K) -> DomainResult<bool> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.contains_key(key))
    }

    fn values(&self) -> DomainResult<Vec<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    fn len(&self) -> DomainResult<usize> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.len())
    }
}
