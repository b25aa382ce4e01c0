use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

/// The default capacity for a `BPE`'s internal cache.
pub(super) static DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Caches `merge_word` results keyed by split text, so repeated words (the
/// common case in natural-language input) skip the merge loop entirely --
/// spec.md 4.5. Reads/writes use `try_read`/`try_write` rather than
/// blocking: a cache miss under contention just falls back to recomputing,
/// which is always correct, merely slower.
#[derive(Debug)]
pub(super) struct Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    map: RwLock<HashMap<K, V>>,
    capacity: usize,
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub(super) fn new(capacity: usize) -> Self {
        Cache {
            map: RwLock::new(HashMap::with_capacity(capacity)),
            capacity,
        }
    }

    pub(super) fn clear(&self) {
        self.map.write().unwrap().clear();
    }

    pub(super) fn get(&self, key: &K) -> Option<V> {
        self.map.try_read().ok()?.get(key).cloned()
    }

    pub(super) fn set(&self, key: K, value: V) {
        if let Ok(mut map) = self.map.try_write() {
            if map.len() < self.capacity {
                map.insert(key, value);
            }
        }
    }
}
