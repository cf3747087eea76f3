//! HTTP surface for the transport pipeline.
//!
//! `POST /transport` takes an itinerary document and returns it enriched
//! with a `transport` plan, the same as a file run.

mod routes;
mod state;

pub use routes::{AppError, ErrorResponse, TransportParams, create_router};
pub use state::AppState;
