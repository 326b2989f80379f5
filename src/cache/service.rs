use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::memory::MemoryTier;
use crate::cache::storage::CacheStorage;
use crate::cache::types::{CacheEntry, CacheStats};

/// Two-tier cache: an in-process map in front of file-per-key storage
///
/// Reads check memory first, then disk, promoting disk hits into memory.
/// Entries older than the TTL are dropped from both tiers when they are
/// read. Disk faults never surface to callers: a failed read is a miss and
/// a failed write leaves only the memory copy.
#[derive(Debug)]
pub struct TieredCache<T> {
    memory: MemoryTier<T>,
    storage: CacheStorage,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl<T> TieredCache<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    /// Create a cache over an existing storage directory
    pub fn new(storage: CacheStorage, ttl: Duration) -> Self {
        Self {
            memory: MemoryTier::new(),
            storage,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock: Arc::new(SystemClock),
        }
    }

    /// Open the cache stored under `<root>/<namespace>`
    pub fn open(root: Option<PathBuf>, namespace: &str, ttl: Duration) -> Result<Self> {
        let storage = CacheStorage::new(root)?
            .namespace(namespace)
            .with_context(|| format!("Failed to open cache namespace '{namespace}'"))?;
        Ok(Self::new(storage, ttl))
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Look up a live entry
    pub async fn get(&self, key: &str) -> Option<CacheEntry<T>> {
        let now = self.clock.now();

        if let Some(entry) = self.memory.get(key) {
            if entry.is_expired(now, self.ttl) {
                tracing::debug!("Cache entry {} expired in memory", key);
                self.evict_stale(key, entry.created_at).await;
                return None;
            }
            return Some(entry);
        }

        let entry = match self.storage.load::<T>(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache entry for {}: {:#}", key, e);
                return None;
            }
        };

        if entry.is_expired(now, self.ttl) {
            tracing::debug!("Cache entry {} expired on disk", key);
            self.evict_stale(key, entry.created_at).await;
            return None;
        }

        self.memory.insert(key, entry.clone());
        Some(entry)
    }

    /// Store a payload in both tiers, stamped with the current time
    pub async fn set(&self, key: &str, payload: T) {
        let entry = CacheEntry::new(payload, self.clock.now());

        if let Err(e) = self.storage.store(key, &entry).await {
            tracing::warn!("Failed to persist cache entry for {}: {:#}", key, e);
        }
        self.memory.insert(key, entry);
    }

    /// Entry counts for both tiers
    pub async fn stats(&self) -> CacheStats {
        let disk_entries = match self.storage.count_entries().await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Failed to count cache entries: {:#}", e);
                0
            }
        };

        CacheStats {
            memory_entries: self.memory.len(),
            disk_entries,
        }
    }

    /// Size of the disk tier in bytes
    pub async fn disk_usage(&self) -> Result<u64> {
        self.storage.disk_usage().await
    }

    /// Drop every entry from both tiers
    pub async fn clear(&self) -> Result<()> {
        self.memory.clear();
        self.storage.clear().await
    }

    /// Drop the expired entry stamped `created_at` from both tiers
    ///
    /// A `set` racing with the read that found the entry expired leaves a
    /// newer stamp behind, and that entry is kept.
    async fn evict_stale(&self, key: &str, created_at: DateTime<Utc>) {
        self.memory.remove_if_created_at(key, created_at);

        match self.storage.load::<T>(key).await {
            Ok(Some(on_disk)) if on_disk.created_at == created_at => {}
            Ok(_) => return,
            Err(e) => {
                tracing::debug!("Leaving unreadable cache entry for {}: {:#}", key, e);
                return;
            }
        }
        if let Err(e) = self.storage.remove(key).await {
            tracing::warn!("Failed to remove expired cache entry for {}: {:#}", key, e);
        }
    }
}
