//! Mode resolution: from raw per-mode results to traveller-facing entries.
//!
//! Walking is only offered for short hops. Longer hops get a synthesized
//! cycling estimate in its place, and hops beyond the cycling cap get no
//! active-travel option at all. A leg never offers both walking and cycling.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{FriendlyMode, RawModeResult, TransportModeEntry, TravelMode, round_to};
use crate::estimate::carbon_estimate;

use super::config::Thresholds;

/// Note attached to synthesized cycling entries.
pub const CYCLE_NOTE: &str = "Estimated based on walking route (not fetched from routing service)";

/// What to do with a leg's walking result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDecision {
    /// Short enough to walk.
    Keep,
    /// Replace walking with a cycling estimate.
    Cycle,
    /// Beyond the walking hard cap.
    DropBeyondWalkCap,
    /// Too long to walk, too far to cycle.
    DropBeyondCycleCap,
}

impl WalkDecision {
    pub fn decide(walk: &RawModeResult, thresholds: &Thresholds) -> Self {
        let km = walk.distance_km;

        if km > thresholds.walk_max_distance_km {
            return WalkDecision::DropBeyondWalkCap;
        }

        let needs_cycle = km > thresholds.cycle_trigger_distance_km
            || walk.duration_minutes > thresholds.cycle_trigger_duration_minutes;

        if !needs_cycle {
            WalkDecision::Keep
        } else if km <= thresholds.cycle_max_distance_km {
            WalkDecision::Cycle
        } else {
            WalkDecision::DropBeyondCycleCap
        }
    }
}

/// Estimate a cycling route from a walking one at a fixed average speed.
pub fn synthesize_cycle(walk: &RawModeResult, cycling_speed_kmh: f64) -> RawModeResult {
    let minutes = walk.distance_km / cycling_speed_kmh * 60.0;

    RawModeResult {
        travel_mode: TravelMode::Cycle,
        distance_km: walk.distance_km,
        distance_meters: walk.distance_meters,
        duration_minutes: round_to(minutes, 1),
        duration_seconds: (minutes * 60.0) as u64,
        estimated_cost_sgd: 0.0,
        transit: None,
        note: Some(CYCLE_NOTE.to_string()),
    }
}

/// Apply the walk/cycle policy in place.
///
/// Leaves `results` untouched when there is no walking result.
pub fn apply_walk_policy(
    results: &mut BTreeMap<TravelMode, RawModeResult>,
    thresholds: &Thresholds,
) {
    let Some(walk) = results.get(&TravelMode::Walk) else {
        return;
    };

    let decision = WalkDecision::decide(walk, thresholds);
    debug!(
        distance_km = walk.distance_km,
        duration_minutes = walk.duration_minutes,
        ?decision,
        "walk policy"
    );

    match decision {
        WalkDecision::Keep => {}
        WalkDecision::Cycle => {
            let cycle = synthesize_cycle(walk, thresholds.cycling_speed_kmh);
            results.remove(&TravelMode::Walk);
            results.insert(TravelMode::Cycle, cycle);
        }
        WalkDecision::DropBeyondWalkCap | WalkDecision::DropBeyondCycleCap => {
            results.remove(&TravelMode::Walk);
        }
    }
}

/// The label a traveller sees for a result.
pub fn friendly_mode(result: &RawModeResult) -> FriendlyMode {
    match result.travel_mode {
        TravelMode::Drive => FriendlyMode::Ride,
        TravelMode::Walk => FriendlyMode::Walk,
        TravelMode::Cycle => FriendlyMode::Cycle,
        TravelMode::Transit => FriendlyMode::classify_transit(
            result.transit.as_ref().map_or("", |t| t.summary.as_str()),
        ),
    }
}

/// `"<distance> km, <duration> mins via <mode>"`.
pub fn route_summary(distance_km: f64, duration_minutes: f64, mode: FriendlyMode) -> String {
    format!(
        "{} km, {:.0} mins via {}",
        format_km(distance_km),
        duration_minutes,
        mode.display_text()
    )
}

/// Shortest form, but always with a decimal point.
fn format_km(km: f64) -> String {
    if km.is_finite() && km.fract() == 0.0 {
        format!("{km:.1}")
    } else {
        format!("{km}")
    }
}

/// Build the output entry for one result, attaching carbon and summary text.
pub fn to_entry(result: &RawModeResult) -> TransportModeEntry {
    let mode = friendly_mode(result);
    let distance_km = result.distance_km;
    let duration_minutes = round_to(result.duration_minutes, 1);

    TransportModeEntry {
        mode,
        distance_km,
        duration_minutes,
        cost_sgd: round_to(result.estimated_cost_sgd, 2),
        carbon_kg: carbon_estimate(mode, distance_km),
        route_summary: route_summary(distance_km, duration_minutes, mode),
        transit_summary: result.transit.as_ref().map(|t| t.summary.clone()),
        num_transfers: result.transit.as_ref().map(|t| t.num_transfers),
        note: result.note.clone(),
    }
}

/// Resolve a leg's raw results into its ordered entry list.
pub fn resolve_modes(
    mut results: BTreeMap<TravelMode, RawModeResult>,
    thresholds: &Thresholds,
) -> Vec<TransportModeEntry> {
    apply_walk_policy(&mut results, thresholds);
    results.values().map(to_entry).collect()
}
