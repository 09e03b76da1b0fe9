//! URL-keyed cache for extracted article text.
//!
//! The cache is an optimization only: callers treat every error from it as a
//! miss. Entries expire lazily, a read past the TTL is a miss and the stale
//! entry is simply overwritten by the next write.
//!
//! # Backends
//!
//! | Backend | Type | Notes |
//! |---------|------|-------|
//! | In-memory | [`MemoryCache`] | Process-local, shared across requests |
//! | Disk | [`DiskCache`] | One JSON file per key |
//! | Disabled | [`CacheBackend::Disabled`] | Always misses, drops writes |

pub mod disk;
pub mod memory;

pub use disk::DiskCache;
pub use memory::MemoryCache;

use crate::config::{CacheBackendKind, CacheConfig};
use crate::error::CacheError;
use crate::models::CacheEntry;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use tracing::info;

/// Key/value store of article text with per-entry expiry.
pub trait ContentCache {
    /// Cached text for `url`, or `None` when absent or expired.
    async fn get(&self, url: &str) -> Result<Option<String>, CacheError>;

    /// Store `content` for `url`, valid for `ttl` from now.
    async fn put(&self, url: &str, content: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Source of the current time; replaced by a manual clock in tests.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed-length key for a URL: hex SHA-256.
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

impl CacheEntry {
    pub fn new(content: &str, cached_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            content: content.to_string(),
            cached_at,
            ttl_secs: ttl.as_secs(),
        }
    }

    /// An entry is valid while `now - cached_at < ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.cached_at);
        let ttl = i64::try_from(self.ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX);
        age < ttl
    }
}

/// Cache backend chosen at runtime from configuration.
#[derive(Debug)]
pub enum CacheBackend {
    Memory(MemoryCache),
    Disk(DiskCache),
    Disabled,
}

impl CacheBackend {
    pub fn from_config(config: &CacheConfig) -> Self {
        let backend = match config.backend {
            CacheBackendKind::Memory => CacheBackend::Memory(MemoryCache::new()),
            CacheBackendKind::Disk => CacheBackend::Disk(DiskCache::new(&config.dir)),
            CacheBackendKind::Disabled => CacheBackend::Disabled,
        };
        info!(backend = ?config.backend, "Cache backend selected");
        backend
    }
}

impl ContentCache for CacheBackend {
    async fn get(&self, url: &str) -> Result<Option<String>, CacheError> {
        match self {
            CacheBackend::Memory(c) => c.get(url).await,
            CacheBackend::Disk(c) => c.get(url).await,
            CacheBackend::Disabled => Ok(None),
        }
    }

    async fn put(&self, url: &str, content: &str, ttl: Duration) -> Result<(), CacheError> {
        match self {
            CacheBackend::Memory(c) => c.put(url, content, ttl).await,
            CacheBackend::Disk(c) => c.put(url, content, ttl).await,
            CacheBackend::Disabled => Ok(()),
        }
    }
}
