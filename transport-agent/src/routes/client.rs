//! Routes API HTTP client.
//!
//! Issues one `computeRoutes` request per (leg, mode). Every dispatch goes
//! through a shared [`RateLimiter`], so clones of a client spread across
//! concurrent workers still respect the minimum request spacing.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::domain::{RawModeResult, TravelMode};

use super::convert::parse_response;
use super::error::RoutesError;
use super::rate_limit::{DEFAULT_MIN_INTERVAL, RateLimiter};
use super::response_log::ResponseLog;
use super::types::{ComputeRoutesRequest, RouteModifiers};
use super::{RouteProvider, RouteQuery};

/// Default endpoint for the Routes API.
pub const DEFAULT_BASE_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";

/// Fields requested from the Routes API.
const FIELD_MASK: &str = "routes.duration,routes.distanceMeters,routes.legs,routes.polyline";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the routes client.
#[derive(Debug, Clone)]
pub struct RoutesConfig {
    /// API key; `None` makes every request fail with `MissingCredential`
    pub api_key: Option<String>,
    /// Endpoint URL (defaults to the production Routes API)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Minimum spacing between dispatched requests
    pub min_request_interval: Duration,
    /// Language for any text in responses
    pub language: String,
    /// Avoidance flags, sent for driving requests only
    pub route_modifiers: RouteModifiers,
}

impl RoutesConfig {
    /// Create a config with the given API key. An empty key counts as missing.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            api_key: (!api_key.is_empty()).then_some(api_key),
            ..Self::default()
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set minimum spacing between requests.
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_route_modifiers(mut self, modifiers: RouteModifiers) -> Self {
        self.route_modifiers = modifiers;
        self
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_request_interval: DEFAULT_MIN_INTERVAL,
            language: "en".to_string(),
            route_modifiers: RouteModifiers::default(),
        }
    }
}

/// Routes API client.
///
/// Cheap to clone; clones share the HTTP connection pool and rate limiter.
#[derive(Debug, Clone)]
pub struct RoutesClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    language: String,
    route_modifiers: RouteModifiers,
    limiter: Arc<RateLimiter>,
}

impl RoutesClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RoutesConfig) -> Result<Self, RoutesError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
            language: config.language,
            route_modifiers: config.route_modifiers,
            limiter: Arc::new(RateLimiter::new(config.min_request_interval)),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the request body for a query.
    ///
    /// Routing preference and avoidance flags are only accepted for driving.
    pub fn build_request(&self, query: &RouteQuery) -> Result<ComputeRoutesRequest, RoutesError> {
        let travel_mode = query
            .mode
            .api_name()
            .ok_or(RoutesError::UnsupportedMode(query.mode))?;
        let is_drive = query.mode == TravelMode::Drive;

        Ok(ComputeRoutesRequest {
            origin: query.origin.into(),
            destination: query.destination.into(),
            travel_mode,
            compute_alternative_routes: false,
            language_code: self.language.clone(),
            units: "METRIC",
            routing_preference: is_drive.then_some("TRAFFIC_AWARE"),
            route_modifiers: is_drive.then_some(self.route_modifiers),
        })
    }

    /// Fetch and parse the first route for one mode.
    ///
    /// Successful (2xx) responses are recorded in `log` before parsing, even
    /// when they contain no routes.
    pub async fn fetch_route(
        &self,
        query: &RouteQuery,
        log: &ResponseLog,
    ) -> Result<RawModeResult, RoutesError> {
        let Some(api_key) = self.api_key.as_deref() else {
            error!(mode = %query.mode, "routing service API key not set");
            return Err(RoutesError::MissingCredential);
        };

        let body = self.build_request(query)?;

        self.limiter.acquire_slot().await;
        debug!(mode = %query.mode, origin = %query.origin, destination = %query.destination, "dispatching route request");

        let response = self
            .http
            .post(&self.base_url)
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!(mode = %query.mode, status = status.as_u16(), "route response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(500).collect();
            error!(mode = %query.mode, status = status.as_u16(), body = %message, "routes API error");
            return Err(RoutesError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let data: Value = serde_json::from_str(&text).map_err(|e| RoutesError::Json {
            message: e.to_string(),
            body: Some(text.chars().take(500).collect()),
        })?;

        log.record(query.mode, query.origin, query.destination, data.clone());

        let result = parse_response(&data, query.mode);
        if let Err(RoutesError::NoRoutes) = &result {
            warn!(mode = %query.mode, "no routes found");
        }
        result
    }
}

impl RouteProvider for RoutesClient {
    async fn compute_route(
        &self,
        query: &RouteQuery,
        log: &ResponseLog,
    ) -> Result<RawModeResult, RoutesError> {
        self.fetch_route(query, log).await
    }
}
