//! In-memory TTL cache for GitHub GET responses.

use std::time::Duration;

use moka::sync::Cache;

/// Upper bound on cached responses; least-valued entries are evicted first.
pub const DEFAULT_CAPACITY: u64 = 2_000;

/// The parts of an HTTP response the client needs to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub body: String,
    /// Raw `Link` header, used for page-count based totals.
    pub link: Option<String>,
}

/// Response cache keyed by request URL. A zero TTL disables caching.
#[derive(Debug)]
pub struct ResponseCache {
    // None when disabled
    cache: Option<Cache<String, CachedResponse>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: u64) -> Self {
        if ttl.is_zero() || capacity == 0 {
            return Self::disabled();
        }
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { cache: Some(cache) }
    }

    pub fn disabled() -> Self {
        Self { cache: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Look up a fresh entry; expired entries are never returned.
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        self.cache.as_ref()?.get(key)
    }

    pub fn insert(&self, key: impl Into<String>, response: CachedResponse) {
        if let Some(cache) = &self.cache {
            cache.insert(key.into(), response);
        }
    }

    /// Number of live entries, after expired ones have been dropped.
    pub fn len(&self) -> usize {
        match &self.cache {
            Some(cache) => {
                cache.run_pending_tasks();
                cache.entry_count() as usize
            }
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::disabled()
    }
}
