//! Day-by-day leg planning and the final document merge.

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{Connection, DayTransport, InvalidLocation, Location, Place, TransportPlan};
use crate::routes::{ResponseLog, RouteProvider};

use super::config::PipelineConfig;
use super::fetch::fetch_leg;
use super::resolve::resolve_modes;
use super::sequence::build_day_sequence;

/// Where the accommodation location lives in an itinerary document.
const ACCOMMODATION_POINTER: &str = "/requirements/optional/accommodation_location";

/// Error planning a document.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("itinerary document must be a JSON object")]
    NotAnObject,

    #[error(
        "no accommodation location: pass one explicitly or set requirements.optional.accommodation_location"
    )]
    MissingAccommodation,

    #[error("invalid accommodation location: {0}")]
    InvalidAccommodation(#[from] InvalidLocation),

    #[error("failed to serialize transport plan: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read the accommodation location from a document.
///
/// Accepts `lat` with either `lng` or `lon`.
pub fn accommodation_from_document(document: &Value) -> Result<Location, PlanError> {
    let location = document
        .pointer(ACCOMMODATION_POINTER)
        .ok_or(PlanError::MissingAccommodation)?;

    let latitude = location
        .get("lat")
        .and_then(Value::as_f64)
        .ok_or(PlanError::MissingAccommodation)?;
    let longitude = location
        .get("lng")
        .or_else(|| location.get("lon"))
        .and_then(Value::as_f64)
        .ok_or(PlanError::MissingAccommodation)?;

    Ok(Location::new(latitude, longitude)?)
}

/// An explicit override wins over the document's own accommodation.
pub fn resolve_accommodation(
    document: &Value,
    explicit: Option<Location>,
) -> Result<Location, PlanError> {
    match explicit {
        Some(location) => Ok(location),
        None => accommodation_from_document(document),
    }
}

/// Copy `document` and attach `plan` under `transport`.
///
/// Every other field of the input is carried over untouched.
pub fn merge_transport(document: &Value, plan: &TransportPlan) -> Result<Value, PlanError> {
    let mut output = document.clone();
    let fields = output.as_object_mut().ok_or(PlanError::NotAnObject)?;
    fields.insert("transport".to_string(), serde_json::to_value(plan)?);
    Ok(output)
}

/// Plans transport for every leg of an itinerary.
///
/// Days and legs are processed one at a time in itinerary order; only the
/// modes of a single leg are fetched concurrently.
pub struct TransportPlanner<'a, P: RouteProvider> {
    provider: &'a P,
    config: &'a PipelineConfig,
    log: &'a ResponseLog,
}

impl<'a, P: RouteProvider> TransportPlanner<'a, P> {
    pub fn new(provider: &'a P, config: &'a PipelineConfig, log: &'a ResponseLog) -> Self {
        Self {
            provider,
            config,
            log,
        }
    }

    /// Plan every day of an `itinerary` object (date → day).
    ///
    /// Connection ids start at 1 and increase across days.
    pub async fn plan(&self, itinerary: &Value, accommodation: Location) -> TransportPlan {
        let mut plan = TransportPlan::new();

        let Some(days) = itinerary.as_object() else {
            warn!("itinerary is not an object, nothing to plan");
            return plan;
        };

        let accommodation = Place::accommodation(accommodation);
        let mut next_id = 1;

        for (date, day) in days {
            info!(%date, "processing day");
            let transport = self.plan_day(day, &accommodation, &mut next_id).await;
            info!(%date, legs = transport.connections.len(), "day complete");
            plan.push_day(date.clone(), transport);
        }

        plan
    }

    /// Plan the legs between consecutive stops of one day.
    pub async fn plan_day(
        &self,
        day: &Value,
        accommodation: &Place,
        next_id: &mut u32,
    ) -> DayTransport {
        let stops = build_day_sequence(day, accommodation);
        let mut connections = Vec::with_capacity(stops.len().saturating_sub(1));

        for pair in stops.windows(2) {
            let connection = self.plan_leg(*next_id, &pair[0], &pair[1]).await;
            *next_id += 1;
            connections.push(connection);
        }

        DayTransport { connections }
    }

    /// Fetch and resolve one leg.
    ///
    /// The leg is returned even when no mode survives.
    pub async fn plan_leg(&self, connection_id: u32, from: &Place, to: &Place) -> Connection {
        info!(
            connection_id,
            from = %from.name,
            to = %to.name,
            "computing leg"
        );

        let results = fetch_leg(
            self.provider,
            self.log,
            from.location,
            to.location,
            &self.config.modes,
            self.config.pool_size(),
        )
        .await;
        let modes = resolve_modes(results, &self.config.thresholds);

        if modes.is_empty() {
            warn!(connection_id, "no transport modes available for leg");
        }

        Connection::new(connection_id, from, to, modes)
    }

    /// Plan a whole document and return the enriched copy with its plan.
    pub async fn plan_document(
        &self,
        document: &Value,
        accommodation: Option<Location>,
    ) -> Result<(Value, TransportPlan), PlanError> {
        if !document.is_object() {
            return Err(PlanError::NotAnObject);
        }
        let accommodation = resolve_accommodation(document, accommodation)?;
        let plan = match document.get("itinerary") {
            Some(itinerary) => self.plan(itinerary, accommodation).await,
            None => {
                warn!("document has no itinerary, nothing to plan");
                TransportPlan::new()
            }
        };
        let output = merge_transport(document, &plan)?;
        Ok((output, plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FriendlyMode, TravelMode};
    use crate::routes::MockRouteProvider;
    use serde_json::json;

    fn provider() -> MockRouteProvider {
        MockRouteProvider::from_responses([
            (
                TravelMode::Drive,
                json!({"routes": [{"distanceMeters": 5000, "duration": "450s"}]}),
            ),
            (
                TravelMode::Walk,
                json!({"routes": [{"distanceMeters": 1500, "duration": "900s"}]}),
            ),
        ])
    }

    fn stop(name: &str, lat: f64) -> Value {
        json!({"name": name, "place_id": name.to_lowercase(), "geo": {"latitude": lat, "longitude": 103.85}})
    }

    fn document() -> Value {
        json!({
            "trip_id": "sg-weekend",
            "requirements": {"optional": {"accommodation_location": {"lat": 1.2966, "lng": 103.8520}}},
            "itinerary": {
                "2025-06-01": {
                    "morning": {"time": "09:00", "items": [stop("Merlion", 1.2868)]},
                    "afternoon": {"time": "14:00", "items": [stop("Gardens", 1.2816)]}
                },
                "2025-06-02": {
                    "morning": {"time": "10:00", "items": stop("Zoo", 1.4043)}
                }
            }
        })
    }

    #[test]
    fn accommodation_lookup() {
        let loc = accommodation_from_document(&document()).unwrap();
        assert_eq!(loc, Location::new(1.2966, 103.8520).unwrap());

        let lon = json!({"requirements": {"optional": {"accommodation_location": {"lat": 1.3, "lon": 103.8}}}});
        assert_eq!(
            accommodation_from_document(&lon).unwrap(),
            Location::new(1.3, 103.8).unwrap()
        );

        assert!(matches!(
            accommodation_from_document(&json!({})),
            Err(PlanError::MissingAccommodation)
        ));

        let bad = json!({"requirements": {"optional": {"accommodation_location": {"lat": 91.0, "lng": 0.0}}}});
        assert!(matches!(
            accommodation_from_document(&bad),
            Err(PlanError::InvalidAccommodation(_))
        ));
    }

    #[test]
    fn explicit_accommodation_wins() {
        let explicit = Location::new(1.35, 103.9).unwrap();
        assert_eq!(
            resolve_accommodation(&document(), Some(explicit)).unwrap(),
            explicit
        );
        assert_eq!(
            resolve_accommodation(&json!({}), Some(explicit)).unwrap(),
            explicit
        );
    }

    #[test]
    fn merge_is_non_destructive() {
        let doc = document();
        let mut plan = TransportPlan::new();
        plan.push_day("2025-06-01", DayTransport::default());

        let merged = merge_transport(&doc, &plan).unwrap();

        assert_eq!(merged["trip_id"], "sg-weekend");
        assert_eq!(merged["itinerary"], doc["itinerary"]);
        assert_eq!(merged["transport"]["2025-06-01"]["connections"], json!([]));
        assert!(doc.get("transport").is_none());

        assert!(matches!(
            merge_transport(&json!([1, 2]), &plan),
            Err(PlanError::NotAnObject)
        ));
    }

    #[tokio::test]
    async fn plans_days_with_global_ids() {
        let provider = provider();
        let config = PipelineConfig::default();
        let log = ResponseLog::new();
        let planner = TransportPlanner::new(&provider, &config, &log);

        let (output, plan) = planner.plan_document(&document(), None).await.unwrap();

        assert_eq!(plan.days_processed(), 2);
        assert_eq!(plan.total_connections(), 3);
        let ids: Vec<u32> = plan.connections().map(|c| c.connection_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let first_day = plan.day("2025-06-01").unwrap();
        assert_eq!(first_day.connections[0].from_place_name, "Accommodation");
        assert_eq!(
            first_day.connections[0].from_place_id.as_deref(),
            Some("accommodation")
        );
        assert_eq!(first_day.connections[1].from_place_name, "Merlion");
        assert_eq!(first_day.connections[1].to_place_name, "Gardens");

        let modes: Vec<FriendlyMode> = first_day.connections[0]
            .transport_modes
            .iter()
            .map(|m| m.mode)
            .collect();
        assert_eq!(modes, vec![FriendlyMode::Ride, FriendlyMode::Walk]);

        assert_eq!(
            output["transport"]["2025-06-02"]["connections"][0]["connection_id"],
            3
        );
        // Two modes per leg reach the provider's recorded responses
        assert_eq!(log.len(), 6);
    }

    #[tokio::test]
    async fn missing_itinerary_plans_nothing() {
        let provider = provider();
        let config = PipelineConfig::default();
        let log = ResponseLog::new();
        let planner = TransportPlanner::new(&provider, &config, &log);

        let doc = json!({"requirements": {"optional": {"accommodation_location": {"lat": 1.3, "lng": 103.8}}}});
        let (output, plan) = planner.plan_document(&doc, None).await.unwrap();

        assert_eq!(plan.days_processed(), 0);
        assert_eq!(output["transport"], json!({}));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn document_must_be_object() {
        let provider = provider();
        let config = PipelineConfig::default();
        let log = ResponseLog::new();
        let planner = TransportPlanner::new(&provider, &config, &log);

        let result = planner.plan_document(&json!("itinerary"), None).await;
        assert!(matches!(result, Err(PlanError::NotAnObject)));
    }

    /// Tracks how many requests are in flight at once.
    #[derive(Default)]
    struct PeakTracker {
        in_flight: std::sync::atomic::AtomicUsize,
        peak: std::sync::atomic::AtomicUsize,
    }

    impl RouteProvider for PeakTracker {
        async fn compute_route(
            &self,
            query: &crate::routes::RouteQuery,
            _log: &ResponseLog,
        ) -> Result<crate::domain::RawModeResult, crate::routes::RoutesError> {
            use std::sync::atomic::Ordering;

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            Err(crate::routes::RoutesError::UnsupportedMode(query.mode))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn leg_fetches_respect_worker_cap() {
        use std::sync::atomic::Ordering;

        let home = Place::accommodation(Location::new(1.2966, 103.8520).unwrap());
        let zoo = Place::new("Zoo", Location::new(1.4043, 103.7930).unwrap(), None);
        let log = ResponseLog::new();

        let provider = PeakTracker::default();
        let config = PipelineConfig::default().with_max_workers(2);
        let planner = TransportPlanner::new(&provider, &config, &log);
        let leg = planner.plan_leg(1, &home, &zoo).await;
        assert!(leg.transport_modes.is_empty());
        assert_eq!(provider.peak.load(Ordering::SeqCst), 2);

        let provider = PeakTracker::default();
        let config = PipelineConfig::default();
        let planner = TransportPlanner::new(&provider, &config, &log);
        planner.plan_leg(2, &home, &zoo).await;
        assert_eq!(provider.peak.load(Ordering::SeqCst), 3);
    }
}
