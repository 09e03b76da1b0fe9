//! In-process cache shared by every request in the process.

use super::{Clock, ContentCache, SystemClock, cache_key};
use crate::error::CacheError;
use crate::models::CacheEntry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::trace;

/// Map of URL key to entry behind an async read/write lock. Last write wins.
#[derive(Debug)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCache for MemoryCache {
    async fn get(&self, url: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().await;
        let hit = entries
            .get(&cache_key(url))
            .filter(|entry| entry.is_fresh(self.clock.now()))
            .map(|entry| entry.content.clone());
        trace!(%url, hit = hit.is_some(), "Memory cache lookup");
        Ok(hit)
    }

    async fn put(&self, url: &str, content: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        if entries.len() < before {
            trace!(evicted = before - entries.len(), "Dropped expired cache entries");
        }
        entries.insert(cache_key(url), CacheEntry::new(content, now, ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;

    const TTL: Duration = Duration::from_secs(24 * 60 * 60);

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = MemoryCache::new();
        cache.put("https://example.com/a", "Body text.", TTL).await.unwrap();
        assert_eq!(
            cache.get("https://example.com/a").await.unwrap().as_deref(),
            Some("Body text.")
        );
        assert_eq!(cache.get("https://example.com/b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss_but_kept() {
        let clock = Arc::new(ManualClock::default());
        let cache = MemoryCache::with_clock(clock.clone());
        cache.put("https://example.com/a", "Old.", TTL).await.unwrap();

        clock.advance(chrono::Duration::hours(24) + chrono::Duration::milliseconds(1));
        assert_eq!(cache.get("https://example.com/a").await.unwrap(), None);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_drops_expired_entries() {
        let clock = Arc::new(ManualClock::default());
        let cache = MemoryCache::with_clock(clock.clone());
        cache.put("https://example.com/a", "Old.", TTL).await.unwrap();
        cache.put("https://example.com/b", "Old too.", TTL).await.unwrap();

        clock.advance(chrono::Duration::hours(25));
        cache.put("https://example.com/c", "New.", TTL).await.unwrap();
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("https://example.com/c").await.unwrap().as_deref(), Some("New."));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = MemoryCache::new();
        cache.put("https://example.com/a", "first", TTL).await.unwrap();
        cache.put("https://example.com/a", "second", TTL).await.unwrap();
        assert_eq!(cache.get("https://example.com/a").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let cache = Arc::new(MemoryCache::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let url = format!("https://example.com/{}", i % 4);
                cache.put(&url, &format!("body {i}"), TTL).await.unwrap();
                cache.get(&url).await.unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }
        assert_eq!(cache.len().await, 4);
    }
}
