//! Application state for the web layer.

use std::sync::Arc;

use crate::pipeline::PipelineConfig;
use crate::routes::RouteProvider;

/// Shared application state.
///
/// The provider (and any cache inside it) is shared by all requests.
pub struct AppState<P> {
    pub provider: Arc<P>,

    /// Pipeline configuration
    pub config: Arc<PipelineConfig>,
}

impl<P: RouteProvider> AppState<P> {
    pub fn new(provider: P, config: PipelineConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config: Arc::new(config),
        }
    }
}

// Derived Clone would require `P: Clone`
impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            config: Arc::clone(&self.config),
        }
    }
}
