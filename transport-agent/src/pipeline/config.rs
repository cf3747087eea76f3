//! Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::TravelMode;

/// Default upper bound on concurrent mode fetches per leg.
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Error loading configuration from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid thresholds in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid thresholds: {0}")]
    Invalid(&'static str),
}

/// Distance and duration limits for active travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Walks longer than this are dropped with no substitute.
    pub walk_max_distance_km: f64,

    /// Walks longer than this are replaced by cycling.
    pub cycle_trigger_distance_km: f64,

    /// Walks slower than this are replaced by cycling.
    pub cycle_trigger_duration_minutes: f64,

    /// Cycling is never offered beyond this distance.
    pub cycle_max_distance_km: f64,

    /// Average speed used to estimate cycling time.
    pub cycling_speed_kmh: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            walk_max_distance_km: 10.0,
            cycle_trigger_distance_km: 2.0,
            cycle_trigger_duration_minutes: 20.0,
            cycle_max_distance_km: 8.0,
            cycling_speed_kmh: 15.0,
        }
    }
}

impl Thresholds {
    /// Load thresholds from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let thresholds: Thresholds =
            serde_json::from_str(&json).map_err(|source| ConfigError::Json {
                path: path.display().to_string(),
                source,
            })?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            self.walk_max_distance_km,
            self.cycle_trigger_distance_km,
            self.cycle_trigger_duration_minutes,
            self.cycle_max_distance_km,
        ];
        if limits.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::Invalid(
                "distance and duration limits must be finite and non-negative",
            ));
        }
        if !(self.cycling_speed_kmh > 0.0 && self.cycling_speed_kmh.is_finite()) {
            return Err(ConfigError::Invalid("cycling speed must be positive"));
        }
        if self.cycle_max_distance_km > self.walk_max_distance_km {
            return Err(ConfigError::Invalid(
                "cycle cap must not exceed the walking hard cap",
            ));
        }
        Ok(())
    }
}

/// Configuration parameters for the transport pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Modes fetched for every leg.
    pub modes: Vec<TravelMode>,

    /// Maximum number of modes fetched concurrently for one leg.
    pub max_workers: usize,

    pub thresholds: Thresholds,
}

impl PipelineConfig {
    pub fn new(modes: Vec<TravelMode>, max_workers: usize, thresholds: Thresholds) -> Self {
        Self {
            modes,
            max_workers,
            thresholds,
        }
    }

    pub fn with_max_workers(mut self, n: usize) -> Self {
        self.max_workers = n;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Worker pool size for one leg: one per mode, capped at `max_workers`.
    pub fn pool_size(&self) -> usize {
        self.modes.len().min(self.max_workers).max(1)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            modes: TravelMode::DEFAULT_FETCHED.to_vec(),
            max_workers: DEFAULT_MAX_WORKERS,
            thresholds: Thresholds::default(),
        }
    }
}
