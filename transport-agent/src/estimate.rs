//! Cost and carbon estimates for transport options.
//!
//! All functions here are pure. Fares are in Singapore dollars, emissions in
//! kilograms of CO2 per passenger.

use crate::domain::{FriendlyMode, round_to};

/// Flat boarding charge for a public transport journey.
const TRANSIT_BOARDING_SGD: f64 = 0.92;

/// Distance-proportional public transport surcharge.
const TRANSIT_PER_KM_SGD: f64 = 0.12;

/// Emission factor in kg CO2 per passenger-km.
pub fn emission_factor(mode: FriendlyMode) -> f64 {
    match mode {
        FriendlyMode::Walk | FriendlyMode::Cycle => 0.0,
        FriendlyMode::Ride => 0.149,
        FriendlyMode::Bus => 0.041,
        FriendlyMode::Mrt => 0.013,
        // Blend of bus and rail for mixed or unclassified routes
        FriendlyMode::PublicTransport => 0.027,
    }
}

/// Estimated emissions for travelling `distance_km` by `mode`, rounded to grams.
pub fn carbon_estimate(mode: FriendlyMode, distance_km: f64) -> f64 {
    round_to(emission_factor(mode) * distance_km.max(0.0), 3)
}

/// Public transport fare: boarding charge plus a per-km surcharge.
///
/// ```
/// use transport_agent::estimate::transit_fare;
///
/// assert_eq!(transit_fare(5.0), 1.52);
/// ```
pub fn transit_fare(distance_km: f64) -> f64 {
    round_to(
        TRANSIT_BOARDING_SGD + TRANSIT_PER_KM_SGD * distance_km.max(0.0),
        2,
    )
}

/// Metered taxi fare model.
///
/// The meter charges a flag-down covering the first stretch, then a fixed
/// increment per distance block (shorter blocks past a threshold) and per
/// block of time spent slower than free-flow traffic.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxiFare {
    pub flag_down_sgd: f64,
    /// Distance covered by the flag-down.
    pub flag_down_km: f64,
    /// Charge per distance or waiting block.
    pub increment_sgd: f64,
    pub block_m: f64,
    /// Distance after which `long_block_m` applies.
    pub long_threshold_km: f64,
    pub long_block_m: f64,
    pub wait_block_secs: f64,
    /// Speed below which the trip counts as waiting time.
    pub free_flow_kmh: f64,
}

impl Default for TaxiFare {
    fn default() -> Self {
        Self {
            flag_down_sgd: 4.80,
            flag_down_km: 1.0,
            increment_sgd: 0.26,
            block_m: 400.0,
            long_threshold_km: 10.0,
            long_block_m: 350.0,
            wait_block_secs: 45.0,
            free_flow_kmh: 40.0,
        }
    }
}

impl TaxiFare {
    /// Estimate the fare for a trip, rounded to cents.
    pub fn estimate(&self, distance_km: f64, duration_minutes: f64) -> f64 {
        let distance_km = distance_km.max(0.0);

        let short_km = (distance_km.min(self.long_threshold_km) - self.flag_down_km).max(0.0);
        let long_km = (distance_km - self.long_threshold_km).max(0.0);
        let distance_blocks =
            (short_km * 1000.0 / self.block_m).ceil() + (long_km * 1000.0 / self.long_block_m).ceil();

        let free_flow_minutes = distance_km / self.free_flow_kmh * 60.0;
        let waiting_secs = ((duration_minutes - free_flow_minutes) * 60.0).max(0.0);
        let waiting_blocks = (waiting_secs / self.wait_block_secs).floor();

        round_to(
            self.flag_down_sgd + self.increment_sgd * (distance_blocks + waiting_blocks),
            2,
        )
    }
}

/// Taxi fare under the default fare model.
pub fn taxi_cost_estimate(distance_km: f64, duration_minutes: f64) -> f64 {
    TaxiFare::default().estimate(distance_km, duration_minutes)
}
