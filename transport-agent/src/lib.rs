//! Itinerary transport planner.
//!
//! Turns a day-by-day travel itinerary into legs between consecutive stops,
//! each annotated with ride, public transport and active-travel options,
//! their cost, and an estimated carbon footprint.

pub mod cache;
pub mod domain;
pub mod estimate;
pub mod pipeline;
pub mod routes;
pub mod run;
pub mod web;
