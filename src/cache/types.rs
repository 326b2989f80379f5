//! Type definitions for improved type safety in the cache module
//!
//! This module provides strongly-typed wrappers for lookup keys and cached
//! entries so cache keys never have to be assembled by hand.

use anyhow::{Result, bail};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum accepted length of a lookup name
pub const MAX_NAME_LEN: usize = 100;

/// Category of a requested documentation item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    /// A UI component page under `/docs/components`
    Component,
    /// A general documentation section
    Doc,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Component => "component",
            LookupKind::Doc => "doc",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "component" => Ok(LookupKind::Component),
            "doc" => Ok(LookupKind::Doc),
            other => bail!("Invalid type \"{other}\". Use \"component\" or \"doc\"."),
        }
    }
}

/// Validate and normalize a lookup name for the given kind
///
/// Names end up inside remote URL paths and cache file names, so anything
/// that could escape a path segment is rejected. Doc names may contain `/`
/// to address nested sections (e.g. `installation/sveltekit`).
pub fn validate_lookup_name(kind: LookupKind, name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        bail!("Name cannot be empty");
    }

    if name.len() > MAX_NAME_LEN {
        bail!("Invalid name: longer than {MAX_NAME_LEN} characters");
    }

    if name.contains("..") || name.contains('\\') {
        bail!("Invalid name '{name}': contains path traversal sequences");
    }

    let allow_slash = kind == LookupKind::Doc;
    if let Some(c) = name
        .chars()
        .find(|&c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || (allow_slash && c == '/')))
    {
        bail!("Invalid name '{name}': character '{c}' is not allowed for a {kind} lookup");
    }

    if allow_slash && name.split('/').any(str::is_empty) {
        bail!("Invalid name '{name}': empty path segment");
    }

    Ok(name.to_string())
}

/// Stable cache key for a (kind, name) pair, rendered as `<kind>:<name>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupKey(String);

impl LookupKey {
    pub fn new(kind: LookupKind, name: &str) -> Self {
        Self(format!("{}:{}", kind.as_str(), name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LookupKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the cache key for a lookup
pub fn build_key(kind: LookupKind, name: &str) -> LookupKey {
    LookupKey::new(kind, name)
}

/// A cached payload stamped with its creation time
///
/// Entries are replaced wholesale on every write and never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub created_at: DateTime<Utc>,
    pub payload: T,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T, created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            payload,
        }
    }

    /// Age of the entry relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.created_at
    }

    /// An entry is expired once its age strictly exceeds the TTL
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        self.age(now) > ttl
    }
}

/// Entry counts for both cache tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub disk_entries: usize,
}
