//! Routing client error types.

use crate::domain::TravelMode;

/// Errors from fetching a single route.
///
/// None of these are fatal to a run: the leg fetcher logs them and drops the
/// mode from that leg.
#[derive(Debug, thiserror::Error)]
pub enum RoutesError {
    /// No API key configured
    #[error("routing service credential not configured")]
    MissingCredential,

    /// Mode cannot be requested from the routing service
    #[error("travel mode {0} cannot be requested from the routing service")]
    UnsupportedMode(TravelMode),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be deserialized
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Service answered but returned no routes
    #[error("no routes returned")]
    NoRoutes,

    /// Duration field was not a `<seconds>s` string
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),
}

impl RoutesError {
    /// Whether the failure came from the routing service or the network,
    /// as opposed to local configuration.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            RoutesError::MissingCredential | RoutesError::UnsupportedMode(_)
        )
    }
}
