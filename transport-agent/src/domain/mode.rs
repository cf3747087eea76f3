//! Travel modes and their user-facing labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A mode of travel between two stops.
///
/// `Drive`, `Transit` and `Walk` are fetched from the routing service.
/// `Cycle` is never fetched; it is synthesized from a walking route.
///
/// The derived ordering is the order entries appear in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Drive,
    Transit,
    Walk,
    Cycle,
}

impl TravelMode {
    /// Modes requested for every leg unless configured otherwise.
    pub const DEFAULT_FETCHED: [TravelMode; 3] =
        [TravelMode::Drive, TravelMode::Transit, TravelMode::Walk];

    /// The routing service's name for this mode, if it can be requested.
    pub fn api_name(self) -> Option<&'static str> {
        match self {
            TravelMode::Drive => Some("DRIVE"),
            TravelMode::Transit => Some("TRANSIT"),
            TravelMode::Walk => Some("WALK"),
            TravelMode::Cycle => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Drive => "DRIVE",
            TravelMode::Transit => "TRANSIT",
            TravelMode::Walk => "WALK",
            TravelMode::Cycle => "CYCLE",
        }
    }

    /// Parse a mode name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DRIVE" => Some(TravelMode::Drive),
            "TRANSIT" => Some(TravelMode::Transit),
            "WALK" => Some(TravelMode::Walk),
            "CYCLE" => Some(TravelMode::Cycle),
            _ => None,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized label a traveller sees for a transport option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendlyMode {
    Walk,
    Cycle,
    Ride,
    Mrt,
    Bus,
    PublicTransport,
}

impl FriendlyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FriendlyMode::Walk => "walk",
            FriendlyMode::Cycle => "cycle",
            FriendlyMode::Ride => "ride",
            FriendlyMode::Mrt => "mrt",
            FriendlyMode::Bus => "bus",
            FriendlyMode::PublicTransport => "public_transport",
        }
    }

    /// Text used after "via" in a route summary.
    pub fn display_text(self) -> &'static str {
        match self {
            FriendlyMode::Ride => "Grab/Private Hire/Taxi",
            other => other.as_str(),
        }
    }

    /// Classify a transit route by scanning its summary for rail and bus tokens.
    ///
    /// Mixed or unrecognized routes are `PublicTransport`.
    pub fn classify_transit(summary: &str) -> Self {
        let summary = summary.to_lowercase();
        let has_rail = ["mrt", "metro", "train"]
            .iter()
            .any(|token| summary.contains(token));
        let has_bus = summary.contains("bus");

        match (has_rail, has_bus) {
            (true, false) => FriendlyMode::Mrt,
            (false, true) => FriendlyMode::Bus,
            _ => FriendlyMode::PublicTransport,
        }
    }
}

impl fmt::Display for FriendlyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
