//! Routes API request and response DTOs.
//!
//! Only the fields the pipeline consumes are modelled. Response fields are
//! optional or defaulted because the service omits empty values.

use serde::{Deserialize, Serialize};

use crate::domain::Location;

/// Body of a `computeRoutes` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRoutesRequest {
    pub origin: Waypoint,
    pub destination: Waypoint,
    pub travel_mode: &'static str,
    pub compute_alternative_routes: bool,
    pub language_code: String,
    pub units: &'static str,
    /// Only valid for `DRIVE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_preference: Option<&'static str>,
    /// Only valid for `DRIVE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_modifiers: Option<RouteModifiers>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Waypoint {
    pub location: WaypointLocation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointLocation {
    pub lat_lng: Location,
}

impl From<Location> for Waypoint {
    fn from(location: Location) -> Self {
        Waypoint {
            location: WaypointLocation { lat_lng: location },
        }
    }
}

/// Things a driving route should avoid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteModifiers {
    pub avoid_tolls: bool,
    pub avoid_highways: bool,
    pub avoid_ferries: bool,
}

/// Response from `computeRoutes`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComputeRoutesResponse {
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

/// A single route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    pub distance_meters: Option<u64>,

    /// Seconds as a string with an `s` suffix, e.g. `"754s"`.
    pub duration: Option<String>,

    #[serde(default)]
    pub legs: Vec<RouteLegDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteLegDto {
    #[serde(default)]
    pub steps: Vec<RouteStepDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStepDto {
    /// `WALK`, `TRANSIT`, `DRIVE`, ...
    pub travel_mode: Option<String>,
    pub distance_meters: Option<u64>,
    pub transit_details: Option<TransitDetailsDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitDetailsDto {
    pub transit_line: Option<TransitLineDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitLineDto {
    pub name: Option<String>,
    pub vehicle: Option<VehicleDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleDto {
    /// `SUBWAY`, `BUS`, `HEAVY_RAIL`, ...
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
}
