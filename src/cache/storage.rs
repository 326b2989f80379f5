use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::cache::constants::*;
use crate::cache::types::CacheEntry;
use crate::cache::utils::encode_key;

/// Manages the file system storage for cached entries, one JSON file per key
#[derive(Debug, Clone)]
pub struct CacheStorage {
    cache_dir: PathBuf,
}

/// On-disk representation of an entry
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry<T> {
    key: String,
    #[serde(flatten)]
    entry: CacheEntry<T>,
}

impl CacheStorage {
    /// Create a new cache storage instance
    pub fn new(custom_cache_dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir = match custom_cache_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .context("Failed to get home directory")?
                .join(CACHE_ROOT_DIR)
                .join(CACHE_DIR),
        };

        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

        Ok(Self { cache_dir })
    }

    /// Storage rooted at a subdirectory, so unrelated payload types never share files
    pub fn namespace(&self, name: &str) -> Result<Self> {
        let cache_dir = self.cache_dir.join(name);
        fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the file path for a key
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{ENTRY_EXTENSION}", encode_key(key)))
    }

    /// Check if an entry file exists for a key, regardless of its age
    pub fn contains(&self, key: &str) -> bool {
        self.entry_path(key).exists()
    }

    /// Load the entry for a key
    ///
    /// Returns `Ok(None)` when nothing is stored. A file whose recorded key
    /// differs from `key` (e.g. on a case-insensitive filesystem) is also
    /// reported as absent.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CacheEntry<T>>> {
        let path = self.entry_path(key);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read cache entry: {}", path.display()));
            }
        };

        let stored: StoredEntry<T> = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt cache entry: {}", path.display()))?;

        if stored.key != key {
            tracing::debug!(
                "Cache file {} holds key {} instead of {}",
                path.display(),
                stored.key,
                key
            );
            return Ok(None);
        }

        Ok(Some(stored.entry))
    }

    /// Persist an entry, replacing any previous one
    ///
    /// The entry is written to a uniquely named temporary file and renamed
    /// into place, so readers see either the old or the new entry in full.
    pub async fn store<T: Serialize + Clone>(&self, key: &str, entry: &CacheEntry<T>) -> Result<()> {
        let stored = StoredEntry {
            key: key.to_string(),
            entry: entry.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;

        let path = self.entry_path(key);
        let temp_path = self.cache_dir.join(format!(
            ".{}.{}.{TEMP_SUFFIX}",
            encode_key(key),
            uuid::Uuid::new_v4().simple()
        ));

        tokio::fs::write(&temp_path, json)
            .await
            .with_context(|| format!("Failed to write cache entry: {}", temp_path.display()))?;

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e)
                .with_context(|| format!("Failed to move cache entry into place: {}", path.display()));
        }

        Ok(())
    }

    /// Remove the entry for a key, if any
    pub async fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove cache entry: {}", path.display())),
        }
    }

    /// Paths of all persisted entries
    async fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(e).context("Failed to read cache directory"),
        };

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            let is_entry = path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION)
                && !entry.file_name().to_string_lossy().starts_with('.');
            if is_entry && entry.file_type().await?.is_file() {
                files.push(path);
            }
        }

        Ok(files)
    }

    /// Count persisted entries, expired ones included
    pub async fn count_entries(&self) -> Result<usize> {
        Ok(self.entry_files().await?.len())
    }

    /// Total size of persisted entries in bytes
    pub async fn disk_usage(&self) -> Result<u64> {
        let mut total_size = 0u64;
        for path in self.entry_files().await? {
            total_size += tokio::fs::metadata(&path).await?.len();
        }
        Ok(total_size)
    }

    /// Remove every persisted entry
    pub async fn clear(&self) -> Result<()> {
        for path in self.entry_files().await? {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to remove cache entry: {}", path.display())
                    });
                }
            }
        }
        Ok(())
    }
}
