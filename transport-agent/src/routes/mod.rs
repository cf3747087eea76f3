//! Routing service client.
//!
//! Fetches point-to-point routes for one travel mode at a time and
//! normalizes them into [`RawModeResult`]s.
//!
//! Key characteristics of the Routes API:
//! - One request per (origin, destination, mode); alternatives are disabled
//! - Durations are strings of whole seconds with an `s` suffix
//! - Routing preference and avoidance flags are only accepted for `DRIVE`
//! - Requests are spaced by a process-wide [`RateLimiter`]

mod client;
mod convert;
mod error;
mod mock;
mod rate_limit;
mod response_log;
mod types;

use std::future::Future;

use crate::domain::{Location, RawModeResult, TravelMode};

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, RoutesClient, RoutesConfig};
pub use convert::{DIRECT_TRANSIT_SUMMARY, convert_route, parse_duration, parse_response, transit_summary};
pub use error::RoutesError;
pub use mock::MockRouteProvider;
pub use rate_limit::{DEFAULT_MIN_INTERVAL, RateLimiter};
pub use response_log::{RawResponseEntry, ResponseLog};
pub use types::{
    ComputeRoutesRequest, ComputeRoutesResponse, RouteDto, RouteLegDto, RouteModifiers,
    RouteStepDto,
};

/// A single point-to-point route request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteQuery {
    pub origin: Location,
    pub destination: Location,
    pub mode: TravelMode,
}

impl RouteQuery {
    pub fn new(origin: Location, destination: Location, mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
            mode,
        }
    }
}

/// Source of routes for the pipeline.
///
/// This abstraction allows the pipeline to run against the live service,
/// recorded fixtures, or test doubles.
pub trait RouteProvider: Send + Sync {
    /// Fetch the route for one mode.
    ///
    /// Implementations that call an external service record each successful
    /// response in `log`.
    fn compute_route(
        &self,
        query: &RouteQuery,
        log: &ResponseLog,
    ) -> impl Future<Output = Result<RawModeResult, RoutesError>> + Send;
}
