//! Fixture-backed route provider for running without API access.
//!
//! Loads recorded Routes API responses from JSON files and serves them as if
//! they were live responses, for every origin/destination pair.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::domain::{RawModeResult, TravelMode};

use super::convert::parse_response;
use super::error::RoutesError;
use super::response_log::ResponseLog;
use super::{RouteProvider, RouteQuery};

/// Route provider that replays one recorded response per travel mode.
#[derive(Debug, Default)]
pub struct MockRouteProvider {
    responses: HashMap<TravelMode, Value>,
    calls: AtomicUsize,
}

impl MockRouteProvider {
    /// Load fixtures from a directory.
    ///
    /// Expects files named after the mode (`DRIVE.json`, `TRANSIT.json`,
    /// `WALK.json`); other files are ignored.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, RoutesError> {
        let data_dir = data_dir.as_ref();
        let mut responses = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| RoutesError::Api {
            status: 0,
            message: format!("Failed to read fixture directory {}: {e}", data_dir.display()),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| RoutesError::Api {
                status: 0,
                message: format!("Failed to read directory entry: {e}"),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let Some(mode) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(TravelMode::parse)
            else {
                continue;
            };

            let json = std::fs::read_to_string(&path).map_err(|e| RoutesError::Api {
                status: 0,
                message: format!("Failed to read {}: {e}", path.display()),
            })?;
            let body: Value = serde_json::from_str(&json).map_err(|e| RoutesError::Json {
                message: format!("Failed to parse {}: {e}", path.display()),
                body: None,
            })?;

            responses.insert(mode, body);
        }

        if responses.is_empty() {
            return Err(RoutesError::Api {
                status: 0,
                message: format!("No fixture files found in {}", data_dir.display()),
            });
        }

        Ok(Self {
            responses,
            calls: AtomicUsize::new(0),
        })
    }

    /// Build a provider from in-memory response bodies.
    pub fn from_responses(responses: impl IntoIterator<Item = (TravelMode, Value)>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Modes that have a recorded response.
    pub fn available_modes(&self) -> Vec<TravelMode> {
        let mut modes: Vec<_> = self.responses.keys().copied().collect();
        modes.sort();
        modes
    }

    /// Number of `compute_route` calls served so far, including failures.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteProvider for MockRouteProvider {
    async fn compute_route(
        &self,
        query: &RouteQuery,
        log: &ResponseLog,
    ) -> Result<RawModeResult, RoutesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if query.mode.api_name().is_none() {
            return Err(RoutesError::UnsupportedMode(query.mode));
        }

        let body = self.responses.get(&query.mode).ok_or_else(|| RoutesError::Api {
            status: 404,
            message: format!("No fixture for mode {}", query.mode),
        })?;

        log.record(query.mode, query.origin, query.destination, body.clone());
        parse_response(body, query.mode)
    }
}
