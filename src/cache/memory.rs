//! In-process cache tier
//!
//! Backed by a sharded concurrent map: every insert, lookup and removal is
//! atomic for its key, so concurrent lookups never observe a half-written
//! entry and no caller-visible lock is held across an await point.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::cache::types::CacheEntry;

#[derive(Debug)]
pub struct MemoryTier<T> {
    entries: DashMap<String, CacheEntry<T>>,
}

impl<T: Clone> MemoryTier<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Get a copy of the entry stored under `key`
    pub fn get(&self, key: &str) -> Option<CacheEntry<T>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Store an entry, replacing any previous one
    pub fn insert(&self, key: &str, entry: CacheEntry<T>) {
        self.entries.insert(key.to_string(), entry);
    }

    /// Remove the entry under `key` only if it is still the one stamped `created_at`
    ///
    /// Returns whether an entry was removed. A newer entry written in the
    /// meantime is left in place.
    pub fn remove_if_created_at(&self, key: &str, created_at: DateTime<Utc>) -> bool {
        self.entries
            .remove_if(key, |_, entry| entry.created_at == created_at)
            .is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Default for MemoryTier<T> {
    fn default() -> Self {
        Self::new()
    }
}
