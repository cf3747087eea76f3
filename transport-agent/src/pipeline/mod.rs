//! Route-leg pipeline.
//!
//! For each itinerary day: order the stops, fetch every travel mode for each
//! consecutive pair, decide which modes to offer, and attach cost and carbon
//! figures. The enriched plan is merged back into the input document.
//!
//! Stages:
//! - [`build_day_sequence`]: accommodation first, then periods in time order
//! - [`fetch_leg`]: bounded concurrent fetch of one leg's modes
//! - [`resolve_modes`]: walk/cycle policy and user-facing entries
//! - [`TransportPlanner`]: drives the above and assigns connection ids

mod assemble;
mod config;
mod fetch;
mod resolve;
mod sequence;

pub use assemble::{
    PlanError, TransportPlanner, accommodation_from_document, merge_transport,
    resolve_accommodation,
};
pub use config::{ConfigError, DEFAULT_MAX_WORKERS, PipelineConfig, Thresholds};
pub use fetch::fetch_leg;
pub use resolve::{
    CYCLE_NOTE, WalkDecision, apply_walk_policy, friendly_mode, resolve_modes, route_summary,
    synthesize_cycle, to_entry,
};
pub use sequence::build_day_sequence;
