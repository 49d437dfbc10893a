//! Lock-sharded string-keyed map shared by the cache and the state store
//!
//! Keys hash to one of a fixed number of shards, each behind its own mutex.
//! Operations on the same key are serialized; operations on keys in
//! different shards do not contend.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard};

const DEFAULT_SHARDS: usize = 16;

#[derive(Debug)]
pub(crate) struct ShardedMap<V> {
    shards: Box<[Mutex<HashMap<String, V>>]>,
}

impl<V> ShardedMap<V> {
    pub(crate) fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    pub(crate) fn with_shards(count: usize) -> Self {
        let shards = (0..count.max(1))
            .map(|_| Mutex::new(HashMap::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { shards }
    }

    fn lock(&self, index: usize) -> MutexGuard<'_, HashMap<String, V>> {
        // Every mutation is a single insert or remove, so a poisoned shard
        // is still consistent.
        self.shards[index]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn index_of(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    /// Runs `f` with exclusive access to the shard owning `key`.
    pub(crate) fn with_shard<R>(&self, key: &str, f: impl FnOnce(&mut HashMap<String, V>) -> R) -> R {
        let mut guard = self.lock(self.index_of(key));
        f(&mut guard)
    }

    pub(crate) fn insert(&self, key: String, value: V) -> Option<V> {
        let index = self.index_of(&key);
        self.lock(index).insert(key, value)
    }

    pub(crate) fn remove(&self, key: &str) -> Option<V> {
        self.with_shard(key, |map| map.remove(key))
    }

    pub(crate) fn clear(&self) {
        for index in 0..self.shards.len() {
            self.lock(index).clear();
        }
    }

    pub(crate) fn len(&self) -> usize {
        (0..self.shards.len()).map(|i| self.lock(i).len()).sum()
    }
}

impl<V> Default for ShardedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}
