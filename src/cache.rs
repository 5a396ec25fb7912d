//! Session-lifetime in-memory caches. Entries are never evicted; the whole
//! cache is dropped on [`SessionCache::clear`] or when the process exits.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    List(usize),
    Detail(u32),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::List(limit) => write!(f, "list:{}", limit),
            CacheKey::Detail(id) => write!(f, "detail:{}", id),
        }
    }
}

/// Values are handed out as `Arc`s so callers share the cached entry
/// instead of copying it.
pub struct SessionCache<V> {
    entries: Mutex<HashMap<CacheKey, Arc<V>>>,
}

impl<V> Default for SessionCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> SessionCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        self.lock().get(key).cloned()
    }

    /// Store `value` under `key`; the last writer wins.
    pub fn insert(&self, key: CacheKey, value: Arc<V>) {
        self.lock().insert(key, value);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
