//! Per-viewer calendar cache.
//!
//! Entries hold a serialized calendar under
//! `events:cal:{viewer}:{start_unix}:{end_unix}`. Only exact windows are
//! served; all of a viewer's entries are dropped together through the
//! `events:cal:{viewer}:*` pattern.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use thiserror::Error;
use uuid::Uuid;

use almanac_core::config::{CacheBackend, CacheConfig};
use almanac_core::constants::CALENDAR_CACHE_NAMESPACE;
use almanac_core::event::TimeWindow;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Byte-oriented key/value store with per-entry TTL and glob-pattern deletion.
#[async_trait]
pub trait CalendarCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Deletes every key matching `pattern` (`*` and `?` wildcards) and returns
    /// how many were removed.
    async fn scan_and_delete(&self, pattern: &str) -> Result<u64, CacheError>;
}

/// Cache key of a viewer's calendar for an exact window.
#[must_use]
pub fn calendar_key(viewer_id: Uuid, window: &TimeWindow) -> String {
    format!(
        "{CALENDAR_CACHE_NAMESPACE}:{viewer_id}:{}:{}",
        window.start.timestamp(),
        window.end.timestamp()
    )
}

/// Pattern matching every cached calendar of a viewer.
#[must_use]
pub fn viewer_pattern(viewer_id: Uuid) -> String {
    format!("{CALENDAR_CACHE_NAMESPACE}:{viewer_id}:*")
}

/// ## Summary
/// Builds the cache backend selected by configuration.
#[must_use]
pub fn build_cache(config: &CacheConfig) -> Arc<dyn CalendarCache> {
    match config.backend {
        CacheBackend::Memory => {
            tracing::info!(
                max_capacity = config.max_capacity,
                ttl_secs = config.ttl_secs,
                "Using in-memory calendar cache"
            );
            Arc::new(MemoryCache::new(config.max_capacity))
        }
        CacheBackend::Disabled => {
            tracing::info!("Calendar cache disabled");
            Arc::new(NoopCache)
        }
    }
}

#[derive(Debug, Clone)]
struct CachedCalendar {
    bytes: Arc<[u8]>,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, CachedCalendar> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedCalendar,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedCalendar,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache backed by moka.
#[derive(Clone)]
pub struct MemoryCache {
    inner: Cache<String, CachedCalendar>,
}

impl MemoryCache {
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Number of live entries after pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

#[async_trait]
impl CalendarCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.inner.get(key).await.map(|entry| entry.bytes.to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let entry = CachedCalendar {
            bytes: value.into(),
            ttl,
        };
        self.inner.insert(key.to_owned(), entry).await;
        Ok(())
    }

    async fn scan_and_delete(&self, pattern: &str) -> Result<u64, CacheError> {
        let matching: Vec<Arc<String>> = self
            .inner
            .iter()
            .filter_map(|(key, _)| glob_match(pattern, &key).then_some(key))
            .collect();

        for key in &matching {
            self.inner.invalidate(key.as_str()).await;
        }

        Ok(u64::try_from(matching.len()).unwrap_or(u64::MAX))
    }
}

/// Cache that stores nothing; every read misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl CalendarCache for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn scan_and_delete(&self, _pattern: &str) -> Result<u64, CacheError> {
        Ok(0)
    }
}

/// Glob match with `*` (any run, including empty) and `?` (one character).
pub(crate) fn glob_match(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();

    let (mut p, mut c) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        match pattern.get(p).copied() {
            Some('*') => {
                backtrack = Some((p, c));
                p += 1;
            }
            Some(expected) if expected == '?' || expected == candidate[c] => {
                p += 1;
                c += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    c = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&ch| ch == '*')
}
