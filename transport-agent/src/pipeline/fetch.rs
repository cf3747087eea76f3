//! Concurrent multi-mode fetch for one leg.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, warn};

use crate::domain::{Location, RawModeResult, TravelMode};
use crate::routes::{ResponseLog, RouteProvider, RouteQuery};

/// Fetch every requested mode for one leg.
///
/// At most `pool_size` requests are in flight at once. Results are
/// collected as they complete; a failed mode is logged and left out of the
/// returned map without affecting the others.
pub async fn fetch_leg<P: RouteProvider>(
    provider: &P,
    log: &ResponseLog,
    origin: Location,
    destination: Location,
    modes: &[TravelMode],
    pool_size: usize,
) -> BTreeMap<TravelMode, RawModeResult> {
    let mut results = BTreeMap::new();
    if modes.is_empty() {
        return results;
    }

    let mut fetches = stream::iter(modes.iter().copied())
        .map(|mode| async move {
            let query = RouteQuery::new(origin, destination, mode);
            debug!(%mode, %origin, %destination, "dispatching route request");
            (mode, provider.compute_route(&query, log).await)
        })
        .buffer_unordered(pool_size.max(1));

    while let Some((mode, result)) = fetches.next().await {
        match result {
            Ok(route) => {
                results.insert(mode, route);
            }
            Err(e) if e.is_transient() => {
                warn!(%mode, error = %e, "route fetch failed, dropping mode");
            }
            Err(e) => {
                error!(%mode, error = %e, "route fetch failed, dropping mode");
            }
        }
    }

    results
}
