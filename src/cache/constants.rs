//! Constants for cache file and directory names

/// Directory names
pub const CACHE_ROOT_DIR: &str = ".shadcn-svelte-mcp";
pub const CACHE_DIR: &str = "cache";
pub const PAGES_DIR: &str = "pages";
pub const INDEX_DIR: &str = "index";

/// File extension for persisted entries
pub const ENTRY_EXTENSION: &str = "json";

/// Suffix for in-flight writes that have not been renamed into place yet
pub const TEMP_SUFFIX: &str = "tmp";

/// Default time-to-live for cached entries (24 hours)
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;
