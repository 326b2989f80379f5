//! # Cache Module
//!
//! This module provides the two-tier cache that sits in front of the remote
//! documentation source.
//!
//! ## Key Components
//!
//! - [`service`] - [`TieredCache`], the memory + disk store with lazy TTL expiry
//! - [`memory`] - In-process tier
//! - [`storage`] - Low-level file-per-key storage for the disk tier
//! - [`types`] - Lookup keys, cache entries and stats
//! - [`clock`] - Time sources used to stamp and expire entries
//! - [`utils`] - Key encoding and formatting helpers

pub mod clock;
pub mod constants;
pub mod memory;
pub mod service;
pub mod storage;
pub mod types;
pub mod utils;

pub use service::TieredCache;
pub use types::{CacheEntry, CacheStats, LookupKey, LookupKind, build_key};
