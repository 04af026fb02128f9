//! Short-lived cache in front of an arrival source.
//!
//! A public node may see the same stop requested many times a minute.
//! Successful lookups are kept for a short TTL, keyed by stop and window,
//! so bursts don't each cost a round trip to the core node. Failures are
//! never cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::{ArrivalWindow, StopId, StopResult};
use crate::source::{ArrivalSource, SourceError};

/// Cache key: (stop, window minutes).
type LookupKey = (StopId, u32);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl CacheConfig {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15),
            max_capacity: 10_000,
        }
    }
}

/// Arrival source with caching.
///
/// Wraps another source and reuses its successful results.
pub struct CachedSource {
    inner: Arc<dyn ArrivalSource>,
    lookups: MokaCache<LookupKey, Arc<StopResult>>,
}

impl CachedSource {
    /// Create a new cached source.
    pub fn new(inner: Arc<dyn ArrivalSource>, config: &CacheConfig) -> Self {
        let lookups = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, lookups }
    }
}

#[async_trait]
impl ArrivalSource for CachedSource {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn arrivals(
        &self,
        stop: &StopId,
        window: ArrivalWindow,
    ) -> Result<StopResult, SourceError> {
        let key = (stop.clone(), window.as_mins());

        // Try cache first
        if let Some(cached) = self.lookups.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let result = self.inner.arrivals(stop, window).await?;
        self.lookups.insert(key, Arc::new(result.clone())).await;

        Ok(result)
    }
}
