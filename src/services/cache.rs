use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// A memoized result and the instant it stops being visible
#[derive(Debug)]
struct CacheEntry {
    bytes: Vec<u8>,
    /// `None` when the ttl reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

type Entries = Cache<String, Arc<CacheEntry>>;

/// TTL cache for idempotent read results
///
/// Values are stored as JSON. Each entry expires `ttl` after it was set: reads
/// past that point miss and evict it, and a deferred task scheduled by `set`
/// removes it even if it is never read again. Writes elsewhere in the system
/// never invalidate entries.
#[derive(Clone)]
pub struct ResultCache {
    entries: Entries,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl ResultCache {
    /// Create a cache holding at most `max_capacity` entries
    pub fn new(max_capacity: u64) -> Self {
        let entries = Cache::builder().max_capacity(max_capacity).build();

        Self {
            entries,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get a value if it has not expired
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        let Some(entry) = self.entries.get(key).await else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Cache miss: {}", key);
            return Ok(None);
        };

        if entry.is_expired(Instant::now()) {
            evict_if_current(&self.entries, key.to_string(), entry).await;
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Cache expired: {}", key);
            return Ok(None);
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Cache hit: {}", key);
        Ok(Some(serde_json::from_slice(&entry.bytes)?))
    }

    /// Store a value for `ttl`, replacing any previous value for the key
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), CacheError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value)?;
        let entry = Arc::new(CacheEntry {
            bytes,
            expires_at: Instant::now().checked_add(ttl),
        });
        self.entries.insert(key.to_string(), Arc::clone(&entry)).await;
        self.schedule_eviction(key.to_string(), entry, ttl);

        tracing::trace!("Cache set: {} (ttl {:?})", key, ttl);
        Ok(())
    }

    /// Store a value for a number of seconds
    pub async fn set_secs<T>(&self, key: &str, value: &T, ttl_secs: u64) -> Result<(), CacheError>
    where
        T: Serialize + ?Sized,
    {
        self.set(key, value, Duration::from_secs(ttl_secs)).await
    }

    /// Whether a live entry exists for the key
    pub async fn has(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .await
            .is_some_and(|entry| !entry.is_expired(Instant::now()))
    }

    pub async fn delete(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    pub async fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }

    /// Number of live entries
    pub async fn size(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Return the cached value, or compute, store and return it
    ///
    /// Only `Ok` results are stored. Cache failures are logged and treated as
    /// a miss.
    pub async fn get_or_try_insert_with<T, E, F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.get::<T>(key).await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => tracing::warn!("Discarding unreadable cache entry {}: {}", key, e),
        }

        let value = compute().await?;
        if let Err(e) = self.set(key, &value, ttl).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }
        Ok(value)
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            size: self.size().await,
            hit_count: hits,
            miss_count: misses,
            hit_rate: if lookups > 0 { hits as f64 / lookups as f64 } else { 0.0 },
        }
    }

    /// Remove `entry` once its ttl has passed, unless the key was overwritten since
    fn schedule_eviction(&self, key: String, entry: Arc<CacheEntry>, ttl: Duration) {
        if entry.expires_at.is_none() {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let entries = self.entries.clone();
        handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            if evict_if_current(&entries, key, entry).await {
                // applies the removal to entry_count
                entries.run_pending_tasks().await;
            }
        });
    }
}

/// Remove `key` only while it still maps to the expired `expected` entry
///
/// The check and the removal happen atomically, so a concurrent `set` for the
/// same key survives.
async fn evict_if_current(entries: &Entries, key: String, expected: Arc<CacheEntry>) -> bool {
    let outcome = entries
        .entry(key)
        .and_compute_with(|current| async move {
            match current {
                Some(current)
                    if Arc::ptr_eq(current.value(), &expected) && expected.is_expired(Instant::now()) =>
                {
                    Op::Remove
                }
                _ => Op::Nop,
            }
        })
        .await;

    matches!(outcome, CompResult::Removed(_))
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for a request: the path plus its query parameters in sorted order
    pub fn request(path: &str, query: &str) -> String {
        let mut params: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
        params.sort_unstable();
        if params.is_empty() {
            format!("GET:{}", path)
        } else {
            format!("GET:{}?{}", path, params.join("&"))
        }
    }

    /// Build a cache key for a single posting
    pub fn posting(posting_id: &str) -> String {
        format!("posting:{}", posting_id)
    }
}
