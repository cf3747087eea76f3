//! Run-scoped record of raw routing responses, kept for diagnostics.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Location, TravelMode};

/// One successful call to the routing service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawResponseEntry {
    pub travel_mode: TravelMode,
    pub origin: Location,
    pub destination: Location,
    pub response: Value,
    /// Unix time in seconds.
    pub timestamp: f64,
}

#[derive(Serialize)]
struct ResponseDump<'a> {
    total_requests: usize,
    responses: &'a [RawResponseEntry],
}

/// Append-only collector for raw responses.
///
/// Create one per run and pass it to whatever makes routing calls. Nothing
/// in the pipeline reads it back.
#[derive(Debug, Default)]
pub struct ResponseLog {
    entries: Mutex<Vec<RawResponseEntry>>,
}

impl ResponseLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RawResponseEntry>> {
        // A panic while pushing cannot leave the Vec half-written
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(
        &self,
        travel_mode: TravelMode,
        origin: Location,
        destination: Location,
        response: Value,
    ) {
        let timestamp = chrono::Utc::now().timestamp_micros() as f64 / 1e6;
        self.lock().push(RawResponseEntry {
            travel_mode,
            origin,
            destination,
            response,
            timestamp,
        });
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn entries(&self) -> Vec<RawResponseEntry> {
        self.lock().clone()
    }

    /// The dump document: `{total_requests, responses}`.
    pub fn to_json(&self) -> Value {
        let entries = self.lock();
        serde_json::to_value(ResponseDump {
            total_requests: entries.len(),
            responses: &entries,
        })
        .unwrap_or(Value::Null)
    }

    /// Write the dump document to `path`, creating parent directories.
    pub fn dump(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.to_json())?;
        std::fs::write(path, json)
    }
}
