//! Conversion from Routes API DTOs to per-mode results.
//!
//! Distances come back in meters and durations as `"<seconds>s"` strings.
//! Transit routes are additionally broken into vehicle rides and a readable
//! summary. Fares are attached here so every result carries a cost.

use serde_json::Value;

use crate::domain::{RawModeResult, TransitDetails, TransitStep, TravelMode, round_to};
use crate::estimate::{taxi_cost_estimate, transit_fare};

use super::error::RoutesError;
use super::types::{ComputeRoutesResponse, RouteDto};

/// Summary used for transit routes with no vehicle rides.
pub const DIRECT_TRANSIT_SUMMARY: &str = "Direct public transport";

/// Parse a full response body and convert its first route.
pub fn parse_response(body: &Value, mode: TravelMode) -> Result<RawModeResult, RoutesError> {
    let response: ComputeRoutesResponse =
        serde_json::from_value(body.clone()).map_err(|e| RoutesError::Json {
            message: e.to_string(),
            body: Some(body.to_string().chars().take(500).collect()),
        })?;

    let route = response.routes.first().ok_or(RoutesError::NoRoutes)?;
    convert_route(route, mode)
}

/// Convert a single route into a `RawModeResult` for `mode`.
pub fn convert_route(route: &RouteDto, mode: TravelMode) -> Result<RawModeResult, RoutesError> {
    let distance_meters = route.distance_meters.unwrap_or(0);
    let raw_km = distance_meters as f64 / 1000.0;
    let distance_km = round_to(raw_km, 2);

    let duration_seconds = parse_duration(route.duration.as_deref().unwrap_or("0s"))?;
    let raw_minutes = duration_seconds as f64 / 60.0;
    let duration_minutes = round_to(raw_minutes, 1);

    let transit = (mode == TravelMode::Transit).then(|| transit_details(route));

    let estimated_cost_sgd = match mode {
        TravelMode::Drive => taxi_cost_estimate(raw_km, raw_minutes),
        TravelMode::Transit => transit_fare(distance_km),
        TravelMode::Walk | TravelMode::Cycle => 0.0,
    };

    Ok(RawModeResult {
        travel_mode: mode,
        distance_km,
        distance_meters,
        duration_minutes,
        duration_seconds,
        estimated_cost_sgd,
        transit,
        note: None,
    })
}

/// Parse a `"<seconds>s"` duration.
pub fn parse_duration(s: &str) -> Result<u64, RoutesError> {
    s.strip_suffix('s')
        .unwrap_or(s)
        .parse()
        .map_err(|_| RoutesError::InvalidDuration(s.to_string()))
}

fn transit_details(route: &RouteDto) -> TransitDetails {
    let mut steps = Vec::new();
    let mut walking_meters = 0u64;

    for step in route.legs.iter().flat_map(|leg| leg.steps.iter()) {
        match step.travel_mode.as_deref() {
            Some("TRANSIT") => {
                let line = step
                    .transit_details
                    .as_ref()
                    .and_then(|d| d.transit_line.as_ref());
                steps.push(TransitStep {
                    line: line
                        .and_then(|l| l.name.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    vehicle: line
                        .and_then(|l| l.vehicle.as_ref())
                        .and_then(|v| v.vehicle_type.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                });
            }
            Some("WALK") => walking_meters += step.distance_meters.unwrap_or(0),
            _ => {}
        }
    }

    TransitDetails {
        num_transfers: steps.len().saturating_sub(1) as u32,
        summary: transit_summary(&steps),
        walking_distance_km: round_to(walking_meters as f64 / 1000.0, 2),
        steps,
    }
}

/// Human-readable description of a transit route.
///
/// ```
/// use transport_agent::domain::TransitStep;
/// use transport_agent::routes::transit_summary;
///
/// let steps = vec![
///     TransitStep { line: "Circle Line".into(), vehicle: "SUBWAY".into() },
///     TransitStep { line: "174".into(), vehicle: "BUS".into() },
/// ];
/// assert_eq!(transit_summary(&steps), "Take MRT Circle Line, then Bus 174");
/// ```
pub fn transit_summary(steps: &[TransitStep]) -> String {
    if steps.is_empty() {
        return DIRECT_TRANSIT_SUMMARY.to_string();
    }

    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let prefix = if i == 0 { "Take" } else { "then" };
            format!("{prefix} {} {}", vehicle_label(&step.vehicle), step.line)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Simplified vehicle name for a raw vehicle type.
fn vehicle_label(vehicle_type: &str) -> String {
    let lower = vehicle_type.to_lowercase();
    if lower.contains("subway") || lower.contains("metro") || lower.contains("mrt") {
        "MRT".to_string()
    } else if lower.contains("bus") {
        "Bus".to_string()
    } else if lower.contains("train") {
        "Train".to_string()
    } else {
        capitalize(&lower)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transit_body() -> Value {
        json!({
            "routes": [{
                "distanceMeters": 8450,
                "duration": "1980s",
                "legs": [{
                    "steps": [
                        {"travelMode": "WALK", "distanceMeters": 320},
                        {
                            "travelMode": "TRANSIT",
                            "distanceMeters": 5200,
                            "transitDetails": {"transitLine": {
                                "name": "North East Line",
                                "vehicle": {"type": "SUBWAY"}
                            }}
                        },
                        {"travelMode": "WALK", "distanceMeters": 85},
                        {
                            "travelMode": "TRANSIT",
                            "distanceMeters": 2600,
                            "transitDetails": {"transitLine": {
                                "name": "65",
                                "vehicle": {"type": "BUS"}
                            }}
                        },
                        {"travelMode": "WALK", "distanceMeters": 245}
                    ]
                }]
            }]
        })
    }

    #[test]
    fn parse_durations() {
        assert_eq!(parse_duration("754s").unwrap(), 754);
        assert_eq!(parse_duration("0s").unwrap(), 0);
        assert_eq!(parse_duration("12").unwrap(), 12);
        assert!(parse_duration("12.5s").is_err());
        assert!(parse_duration("abc").is_err());
    }

    #[test]
    fn walk_route() {
        let body = json!({"routes": [{"distanceMeters": 1534, "duration": "1122s"}]});
        let result = parse_response(&body, TravelMode::Walk).unwrap();

        assert_eq!(result.travel_mode, TravelMode::Walk);
        assert_eq!(result.distance_meters, 1534);
        assert_eq!(result.distance_km, 1.53);
        assert_eq!(result.duration_seconds, 1122);
        assert_eq!(result.duration_minutes, 18.7);
        assert_eq!(result.estimated_cost_sgd, 0.0);
        assert!(result.transit.is_none());
    }

    #[test]
    fn drive_route_uses_taxi_fare() {
        let body = json!({"routes": [{"distanceMeters": 5000, "duration": "450s"}]});
        let result = parse_response(&body, TravelMode::Drive).unwrap();

        assert_eq!(result.estimated_cost_sgd, taxi_cost_estimate(5.0, 7.5));
        assert!(result.transit.is_none());
    }

    #[test]
    fn transit_route_details() {
        let result = parse_response(&transit_body(), TravelMode::Transit).unwrap();

        assert_eq!(result.distance_km, 8.45);
        assert_eq!(result.duration_minutes, 33.0);
        assert_eq!(result.estimated_cost_sgd, transit_fare(8.45));

        let transit = result.transit.unwrap();
        assert_eq!(transit.num_transfers, 1);
        assert_eq!(transit.steps.len(), 2);
        assert_eq!(transit.steps[0].line, "North East Line");
        assert_eq!(transit.steps[1].vehicle, "BUS");
        assert_eq!(transit.walking_distance_km, 0.65);
        assert_eq!(
            transit.summary,
            "Take MRT North East Line, then Bus 65"
        );
    }

    #[test]
    fn transit_without_rides_is_direct() {
        let body = json!({"routes": [{"distanceMeters": 400, "duration": "300s"}]});
        let result = parse_response(&body, TravelMode::Transit).unwrap();
        let transit = result.transit.unwrap();

        assert_eq!(transit.num_transfers, 0);
        assert_eq!(transit.summary, DIRECT_TRANSIT_SUMMARY);
    }

    #[test]
    fn missing_fields_default() {
        let body = json!({"routes": [{}]});
        let result = parse_response(&body, TravelMode::Walk).unwrap();
        assert_eq!(result.distance_meters, 0);
        assert_eq!(result.duration_seconds, 0);
    }

    #[test]
    fn empty_routes_is_error() {
        let body = json!({"routes": []});
        assert!(matches!(
            parse_response(&body, TravelMode::Walk),
            Err(RoutesError::NoRoutes)
        ));
        assert!(matches!(
            parse_response(&json!({}), TravelMode::Walk),
            Err(RoutesError::NoRoutes)
        ));
    }

    #[test]
    fn malformed_body_is_error() {
        let body = json!({"routes": "nope"});
        assert!(matches!(
            parse_response(&body, TravelMode::Drive),
            Err(RoutesError::Json { .. })
        ));

        let body = json!({"routes": [{"duration": "fast"}]});
        assert!(matches!(
            parse_response(&body, TravelMode::Drive),
            Err(RoutesError::InvalidDuration(_))
        ));
    }

    #[test]
    fn vehicle_labels() {
        assert_eq!(vehicle_label("SUBWAY"), "MRT");
        assert_eq!(vehicle_label("METRO_RAIL"), "MRT");
        assert_eq!(vehicle_label("BUS"), "Bus");
        assert_eq!(vehicle_label("TROLLEYBUS"), "Bus");
        assert_eq!(vehicle_label("COMMUTER_TRAIN"), "Train");
        assert_eq!(vehicle_label("HEAVY_RAIL"), "Heavy_rail");
        assert_eq!(vehicle_label("Unknown"), "Unknown");
        assert_eq!(vehicle_label(""), "");
    }
}
