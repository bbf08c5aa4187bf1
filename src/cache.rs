//! In-memory memoization for resolver lookups
//!
//! Results live for the process lifetime; there is no eviction. Callers that
//! need fresh data clear the memo explicitly. Concurrent misses for the same
//! input may each perform the underlying fetch; the last writer wins, which
//! is harmless because every lookup is a pure function of its arguments.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

/// Memo for a single argument-free lookup.
///
/// A poisoned lock behaves like an empty cell, so a panicking sibling task
/// costs at most a refetch.
#[derive(Debug)]
pub struct MemoCell<T> {
    slot: Mutex<Option<T>>,
}

impl<T> MemoCell<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn set(&self, value: T) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(value);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

impl<T: Clone> MemoCell<T> {
    pub fn get(&self) -> Option<T> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl<T> Default for MemoCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Memo keyed by the lookup's argument tuple.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K: Eq + Hash, V> MemoCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, key: K, value: V) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, value);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl<K: Eq + Hash, V: Clone> MemoCache<K, V> {
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

impl<K: Eq + Hash, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
