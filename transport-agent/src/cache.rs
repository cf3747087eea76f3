//! Caching layer for routing results.
//!
//! Itineraries often repeat a hop (the same hotel to the same hawker centre
//! on two days), and the HTTP server sees the same legs across requests.
//! Successful results are cached by (mode, origin, destination) with
//! coordinates quantized to micro-degrees. Failures are never cached.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{RawModeResult, TravelMode};
use crate::routes::{ResponseLog, RouteProvider, RouteQuery, RoutesError};

/// Cache key: mode plus quantized origin and destination.
type RouteKey = (TravelMode, (i64, i64), (i64, i64));

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 1000,
        }
    }
}

fn route_key(query: &RouteQuery) -> RouteKey {
    (
        query.mode,
        query.origin.quantized(),
        query.destination.quantized(),
    )
}

/// Route provider with caching.
///
/// Wraps another provider and caches its successful results. Cache hits do
/// not reach the inner provider, so they add nothing to the response log.
pub struct CachedRouteProvider<P> {
    inner: P,
    routes: MokaCache<RouteKey, RawModeResult>,
}

impl<P: RouteProvider> CachedRouteProvider<P> {
    /// Create a new cached provider.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, routes }
    }

    /// Access the underlying provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }
}

impl<P: RouteProvider> RouteProvider for CachedRouteProvider<P> {
    async fn compute_route(
        &self,
        query: &RouteQuery,
        log: &ResponseLog,
    ) -> Result<RawModeResult, RoutesError> {
        let key = route_key(query);

        if let Some(cached) = self.routes.get(&key).await {
            trace!(mode = %query.mode, "route cache hit");
            return Ok(cached);
        }

        let result = self.inner.compute_route(query, log).await?;
        self.routes.insert(key, result.clone()).await;
        trace!(mode = %query.mode, entries = self.entry_count(), "route cached");
        Ok(result)
    }
}
