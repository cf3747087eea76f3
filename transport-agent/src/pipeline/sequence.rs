//! Ordered stop list for one itinerary day.
//!
//! A day maps period names (`morning`, `lunch`, ...) to period objects with a
//! `"HH:MM"` `time` and an `items` field holding one item or a list. Periods
//! are visited in time order, items in list order, after the accommodation.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{Location, Place};

/// Build the stop sequence for a day, starting at `accommodation`.
///
/// Periods without a string `time` are left out. Null items and items without
/// usable coordinates are skipped.
pub fn build_day_sequence(day: &Value, accommodation: &Place) -> Vec<Place> {
    let mut sequence = vec![accommodation.clone()];

    let Some(periods) = day.as_object() else {
        debug!("day is not an object, no stops");
        return sequence;
    };

    let mut timed: Vec<(&str, &str, &Value)> = periods
        .iter()
        .filter_map(|(name, period)| {
            let time = period.get("time")?.as_str()?;
            Some((time, name.as_str(), period))
        })
        .collect();

    // Stable, so periods sharing a time keep document order
    timed.sort_by(|a, b| a.0.cmp(b.0));

    debug!(
        periods = ?timed.iter().map(|(_, name, _)| *name).collect::<Vec<_>>(),
        "sequencing periods"
    );

    for (_, period_name, period) in timed {
        for item in period_items(period) {
            match place_from_item(item) {
                Some(place) => {
                    info!(place = %place.name, period = period_name, "added stop");
                    sequence.push(place);
                }
                None => warn!(period = period_name, "skipping item without coordinates"),
            }
        }
    }

    sequence
}

/// The items of a period, whether given as a list or a single value.
fn period_items(period: &Value) -> Vec<&Value> {
    match period.get("items") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item) if is_truthy(item) => vec![item],
        _ => Vec::new(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Convert an itinerary item into a stop, if it has valid coordinates.
fn place_from_item(item: &Value) -> Option<Place> {
    let item = item.as_object()?;
    let geo = item.get("geo")?;
    let latitude = geo.get("latitude")?.as_f64()?;
    let longitude = geo.get("longitude")?.as_f64()?;
    let location = Location::new(latitude, longitude).ok()?;

    let name = item
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown");
    let place_id = item
        .get("place_id")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(Place::new(name, location, place_id))
}
