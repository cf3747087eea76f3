//! Parsed per-mode routing results for a single leg.

use serde::Serialize;

use super::TravelMode;

/// One public-transport vehicle ride within a transit route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitStep {
    /// Line name as reported by the routing service (e.g. "North East Line").
    pub line: String,
    /// Raw vehicle type (e.g. "SUBWAY", "BUS").
    pub vehicle: String,
}

/// Transit-only fields of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitDetails {
    pub num_transfers: u32,
    pub steps: Vec<TransitStep>,
    pub summary: String,
    /// Walking done within the transit route (to/from/between stops).
    pub walking_distance_km: f64,
}

/// A route for one travel mode, normalized from the routing service response
/// or synthesized from another mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawModeResult {
    pub travel_mode: TravelMode,
    /// Rounded to 2 decimals.
    pub distance_km: f64,
    pub distance_meters: u64,
    /// Rounded to 1 decimal.
    pub duration_minutes: f64,
    pub duration_seconds: u64,
    pub estimated_cost_sgd: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit: Option<TransitDetails>,
    /// Set when the result was estimated rather than fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round_to(2.345678, 2), 2.35);
        assert_eq!(round_to(12.04, 1), 12.0);
        assert_eq!(round_to(0.0, 3), 0.0);
        assert_eq!(round_to(1.23456, 3), 1.235);
    }
}
