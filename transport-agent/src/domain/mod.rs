//! Domain types for itinerary transport planning.
//!
//! Stops, travel modes, per-mode routing results and the user-facing
//! connections built from them. Locations are validated at construction.

mod connection;
mod mode;
mod place;
mod route;

pub use connection::{Connection, DayTransport, TransportModeEntry, TransportPlan};
pub use mode::{FriendlyMode, TravelMode};
pub use place::{ACCOMMODATION_PLACE_ID, InvalidLocation, Location, Place};
pub use route::{RawModeResult, TransitDetails, TransitStep, round_to};
