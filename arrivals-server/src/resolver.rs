//! Arrival resolution.
//!
//! The resolver sits between the web layer and whichever [`ArrivalSource`]
//! this node was started with. [`ArrivalResolver::lookup`] reports failures
//! as errors; everything else on the resolver turns a failure into the
//! empty result for that stop, so callers always get a well-formed answer.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::join_all;

use crate::cache::{CacheConfig, CachedSource};
use crate::config::ResolutionContext;
use crate::domain::{Arrival, ArrivalWindow, StopId, StopResult, StopResults};
use crate::source::{ArrivalSource, LocalSource, ProxySource, SourceError};
use crate::upstream::UpstreamConfig;

/// Resolves arrivals through a fixed source.
#[derive(Clone)]
pub struct ArrivalResolver {
    source: Arc<dyn ArrivalSource>,
}

impl ArrivalResolver {
    /// Create a resolver over an explicit source.
    pub fn new(source: Arc<dyn ArrivalSource>) -> Self {
        Self { source }
    }

    /// Pick the source for this deployment.
    ///
    /// A public node with an upstream URL proxies (through a cache when the
    /// TTL is non-zero); anything else computes locally.
    pub fn from_context(context: &ResolutionContext) -> Self {
        let source: Arc<dyn ArrivalSource> = match context.delegate_to() {
            Some(base_url) => {
                let config = UpstreamConfig::new(base_url)
                    .with_secret(context.secret.clone())
                    .with_timeout(context.upstream_timeout);
                let proxy: Arc<dyn ArrivalSource> = Arc::new(ProxySource::new(config));

                if context.cache_ttl.is_zero() {
                    proxy
                } else {
                    Arc::new(CachedSource::new(
                        proxy,
                        &CacheConfig::with_ttl(context.cache_ttl),
                    ))
                }
            }
            None => Arc::new(LocalSource::new()),
        };

        tracing::info!(role = %context.role, source = source.name(), "arrival source selected");
        Self { source }
    }

    /// Name of the configured source.
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Look up one stop, reporting failure.
    pub async fn lookup(
        &self,
        stop: &StopId,
        window: ArrivalWindow,
    ) -> Result<StopResult, SourceError> {
        self.source.arrivals(stop, window).await
    }

    /// Resolve one stop. Failures, and a panicking source, give the empty
    /// result.
    pub async fn resolve_stop(&self, stop: &StopId, window: ArrivalWindow) -> StopResult {
        if stop.is_empty() {
            return StopResult::empty();
        }

        let lookup = AssertUnwindSafe(self.lookup(stop, window)).catch_unwind().await;
        let Ok(lookup) = lookup else {
            tracing::error!(%stop, "arrival lookup panicked");
            return StopResult::empty();
        };

        match lookup {
            Ok(result) => result,
            Err(SourceError::UnknownStop(_)) => {
                tracing::debug!(%stop, "unknown stop");
                StopResult::empty()
            }
            Err(e) => {
                let source = self.source.name();
                tracing::warn!(%stop, source, error = %e, "arrival lookup failed");
                StopResult::empty()
            }
        }
    }

    /// Resolve the arrivals at one stop. Failures give no arrivals.
    pub async fn resolve(&self, stop: &StopId, window: ArrivalWindow) -> Vec<Arrival> {
        self.resolve_stop(stop, window).await.arrivals
    }

    /// Resolve several stops concurrently.
    ///
    /// Every requested stop gets an entry. Lookups share nothing, and a
    /// lookup that fails, or panics, only empties its own entry.
    pub async fn resolve_many<I>(&self, stops: I, window: ArrivalWindow) -> StopResults
    where
        I: IntoIterator<Item = StopId>,
    {
        let lookups = stops.into_iter().map(|stop| async move {
            let result = self.resolve_stop(&stop, window).await;
            (stop, result)
        });

        join_all(lookups).await.into_iter().collect()
    }
}
