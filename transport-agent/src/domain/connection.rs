//! User-facing legs and the per-day transport plan.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{FriendlyMode, Place};

/// One transport option for a leg, as presented to the traveller.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TransportModeEntry {
    pub mode: FriendlyMode,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub cost_sgd: f64,
    pub carbon_kg: f64,
    pub route_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_transfers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A directed hop between two consecutive stops of a day.
///
/// `connection_id` increases across the whole itinerary, not per day.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Connection {
    pub connection_id: u32,
    pub from_place_id: Option<String>,
    pub to_place_id: Option<String>,
    pub from_place_name: String,
    pub to_place_name: String,
    pub transport_modes: Vec<TransportModeEntry>,
}

impl Connection {
    pub fn new(
        connection_id: u32,
        from: &Place,
        to: &Place,
        transport_modes: Vec<TransportModeEntry>,
    ) -> Self {
        Self {
            connection_id,
            from_place_id: from.place_id.clone(),
            to_place_id: to.place_id.clone(),
            from_place_name: from.name.clone(),
            to_place_name: to.name.clone(),
            transport_modes,
        }
    }
}

/// All legs of one itinerary day.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DayTransport {
    pub connections: Vec<Connection>,
}

/// Legs for every day, in itinerary order.
///
/// Serializes as a JSON object keyed by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportPlan {
    days: Vec<(String, DayTransport)>,
}

impl TransportPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_day(&mut self, date: impl Into<String>, day: DayTransport) {
        self.days.push((date.into(), day));
    }

    pub fn day(&self, date: &str) -> Option<&DayTransport> {
        self.days.iter().find(|(d, _)| d == date).map(|(_, day)| day)
    }

    pub fn days_processed(&self) -> usize {
        self.days.len()
    }

    pub fn total_connections(&self) -> usize {
        self.days.iter().map(|(_, day)| day.connections.len()).sum()
    }

    /// Every connection, in date then leg order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.days.iter().flat_map(|(_, day)| day.connections.iter())
    }
}

impl Serialize for TransportPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (date, day) in &self.days {
            map.serialize_entry(date, day)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;

    fn place(name: &str, id: Option<&str>) -> Place {
        Place::new(
            name,
            Location::new(1.3, 103.8).unwrap(),
            id.map(str::to_string),
        )
    }

    #[test]
    fn connection_copies_endpoints() {
        let from = place("Accommodation", Some("accommodation"));
        let to = place("Gardens by the Bay", None);
        let conn = Connection::new(7, &from, &to, vec![]);

        assert_eq!(conn.connection_id, 7);
        assert_eq!(conn.from_place_id.as_deref(), Some("accommodation"));
        assert_eq!(conn.to_place_id, None);
        assert_eq!(conn.to_place_name, "Gardens by the Bay");
    }

    #[test]
    fn plan_serializes_in_insertion_order() {
        let mut plan = TransportPlan::new();
        plan.push_day("2025-06-02", DayTransport::default());
        plan.push_day("2025-06-01", DayTransport::default());

        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(
            json,
            r#"{"2025-06-02":{"connections":[]},"2025-06-01":{"connections":[]}}"#
        );
    }

    #[test]
    fn entry_omits_absent_optionals() {
        let entry = TransportModeEntry {
            mode: FriendlyMode::Walk,
            distance_km: 1.5,
            duration_minutes: 15.0,
            cost_sgd: 0.0,
            carbon_kg: 0.0,
            route_summary: "1.5 km, 15 mins via walk".into(),
            transit_summary: None,
            num_transfers: None,
            note: None,
        };
        let value = serde_json::to_value(&entry).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["mode"], "walk");
        assert!(!obj.contains_key("transit_summary"));
        assert!(!obj.contains_key("num_transfers"));
        assert!(!obj.contains_key("note"));
    }

    #[test]
    fn totals() {
        let a = place("A", Some("a"));
        let b = place("B", Some("b"));
        let mut plan = TransportPlan::new();
        plan.push_day(
            "d1",
            DayTransport {
                connections: vec![Connection::new(1, &a, &b, vec![])],
            },
        );
        plan.push_day("d2", DayTransport::default());

        assert_eq!(plan.days_processed(), 2);
        assert_eq!(plan.total_connections(), 1);
        assert!(plan.day("d2").unwrap().connections.is_empty());
        assert!(plan.day("d3").is_none());
    }
}
