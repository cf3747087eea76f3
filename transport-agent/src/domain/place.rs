//! Geographic locations and itinerary stops.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Place id given to the synthetic accommodation stop.
pub const ACCOMMODATION_PLACE_ID: &str = "accommodation";

/// Error returned when a coordinate pair is not a usable location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid location: {reason}")]
pub struct InvalidLocation {
    reason: String,
}

/// A WGS84 coordinate pair in decimal degrees.
///
/// # Examples
///
/// ```
/// use transport_agent::domain::Location;
///
/// let loc: Location = "1.3294,103.8021".parse().unwrap();
/// assert_eq!(loc.latitude, 1.3294);
///
/// assert!(Location::new(91.0, 0.0).is_err());
/// assert!("1.3".parse::<Location>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Create a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidLocation> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidLocation {
                reason: format!("latitude {latitude} out of range"),
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidLocation {
                reason: format!("longitude {longitude} out of range"),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Coordinates scaled to integer micro-degrees, for use as a hash key.
    pub fn quantized(&self) -> (i64, i64) {
        (
            (self.latitude * 1e6).round() as i64,
            (self.longitude * 1e6).round() as i64,
        )
    }
}

impl FromStr for Location {
    type Err = InvalidLocation;

    /// Parse `"lat,lon"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s.split_once(',').ok_or_else(|| InvalidLocation {
            reason: format!("expected \"lat,lon\", got {s:?}"),
        })?;
        let lat: f64 = lat.trim().parse().map_err(|_| InvalidLocation {
            reason: format!("latitude {lat:?} is not a number"),
        })?;
        let lon: f64 = lon.trim().parse().map_err(|_| InvalidLocation {
            reason: format!("longitude {lon:?} is not a number"),
        })?;
        Location::new(lat, lon)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A stop on a day's itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: String,
    pub location: Location,
    pub place_id: Option<String>,
}

impl Place {
    pub fn new(name: impl Into<String>, location: Location, place_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            location,
            place_id,
        }
    }

    /// The accommodation stop every day starts from.
    pub fn accommodation(location: Location) -> Self {
        Self::new(
            "Accommodation",
            location,
            Some(ACCOMMODATION_PLACE_ID.to_string()),
        )
    }
}
