//! Cache persisted as one JSON file per URL key under a directory.
//!
//! Writes go to a temporary file that is then renamed over the target, so
//! concurrent writers of the same key never leave a torn entry behind; the
//! last rename wins.

use super::{Clock, ContentCache, SystemClock, cache_key};
use crate::error::CacheError;
use crate::models::CacheEntry;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, instrument};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub struct DiskCache {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl DiskCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    pub fn with_clock(dir: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(url)))
    }
}

impl ContentCache for DiskCache {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, url: &str) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(url);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry: CacheEntry = serde_json::from_str(&raw)?;
        if entry.is_fresh(self.clock.now()) {
            Ok(Some(entry.content))
        } else {
            debug!(path = %path.display(), "Disk cache entry expired");
            Ok(None)
        }
    }

    #[instrument(level = "debug", skip(self, content))]
    async fn put(&self, url: &str, content: &str, ttl: Duration) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).await?;
        let entry = CacheEntry::new(content, self.clock.now(), ttl);
        let json = serde_json::to_vec(&entry)?;

        let path = self.entry_path(url);
        let tmp = path.with_extension(format!(
            "{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp, json).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %path.display(), "Wrote disk cache entry");
        Ok(())
    }
}
