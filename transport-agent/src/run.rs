//! File-to-file runs of the transport pipeline.
//!
//! A run reads an itinerary document, plans every leg, and writes the
//! enriched document plus a diagnostic dump of the raw routing responses.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::domain::{Location, round_to};
use crate::pipeline::{PipelineConfig, PlanError, TransportPlanner};
use crate::routes::{ResponseLog, RouteProvider};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub days_processed: usize,
    pub total_connections: usize,
    pub processing_time_seconds: f64,
}

/// Run-fatal failures.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RunError {
    /// Structured form reported to the caller.
    pub fn to_json(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// An enriched document and its summary.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub document: Value,
    pub summary: RunSummary,
}

/// Plan a document in memory.
///
/// The returned document has `transport` and `processing_time_seconds`
/// added; the input is not modified.
pub async fn process_document<P: RouteProvider>(
    provider: &P,
    config: &PipelineConfig,
    log: &ResponseLog,
    document: &Value,
    accommodation: Option<Location>,
) -> Result<ProcessedDocument, PlanError> {
    let start = Instant::now();

    let planner = TransportPlanner::new(provider, config, log);
    let (mut output, plan) = planner.plan_document(document, accommodation).await?;

    let processing_time_seconds = round_to(start.elapsed().as_secs_f64(), 2);
    if let Some(fields) = output.as_object_mut() {
        fields.insert(
            "processing_time_seconds".to_string(),
            json!(processing_time_seconds),
        );
    }

    Ok(ProcessedDocument {
        document: output,
        summary: RunSummary {
            days_processed: plan.days_processed(),
            total_connections: plan.total_connections(),
            processing_time_seconds,
        },
    })
}

/// Path of the raw response dump written next to `output`.
///
/// `plan.json` becomes `plan_raw_responses.json`.
pub fn raw_responses_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transport".to_string());
    output.with_file_name(format!("{stem}_raw_responses.json"))
}

/// Plan the document at `input` and write the result to `output`.
pub async fn process_file<P: RouteProvider>(
    provider: &P,
    config: &PipelineConfig,
    input: &Path,
    output: &Path,
    accommodation: Option<Location>,
) -> Result<RunSummary, RunError> {
    let json = tokio::fs::read_to_string(input)
        .await
        .map_err(|source| RunError::Read {
            path: input.to_path_buf(),
            source,
        })?;
    let document: Value = serde_json::from_str(&json).map_err(|source| RunError::Parse {
        path: input.to_path_buf(),
        source,
    })?;

    info!(input = %input.display(), "loaded itinerary");

    let log = ResponseLog::new();
    let processed = process_document(provider, config, &log, &document, accommodation).await?;

    write_json(output, &processed.document).await?;
    info!(
        output = %output.display(),
        days = processed.summary.days_processed,
        connections = processed.summary.total_connections,
        seconds = processed.summary.processing_time_seconds,
        "wrote transport plan"
    );

    let raw_path = raw_responses_path(output);
    match log.dump(&raw_path) {
        Ok(()) => info!(
            path = %raw_path.display(),
            requests = log.len(),
            "wrote raw responses"
        ),
        Err(e) => warn!(path = %raw_path.display(), error = %e, "failed to write raw responses"),
    }

    Ok(processed.summary)
}

async fn write_json(path: &Path, value: &Value) -> Result<(), RunError> {
    let write_error = |source| RunError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let body = serde_json::to_string_pretty(value)
        .map_err(|e| write_error(std::io::Error::other(e)))?;
    tokio::fs::write(path, body).await.map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TravelMode;
    use crate::routes::MockRouteProvider;

    fn provider() -> MockRouteProvider {
        MockRouteProvider::from_responses([(
            TravelMode::Walk,
            json!({"routes": [{"distanceMeters": 700, "duration": "540s"}]}),
        )])
    }

    fn document() -> Value {
        json!({
            "requirements": {"optional": {"accommodation_location": {"lat": 1.3, "lng": 103.85}}},
            "itinerary": {
                "2025-06-01": {
                    "morning": {"time": "09:00", "items": [
                        {"name": "Chinatown", "geo": {"latitude": 1.2834, "longitude": 103.8443}}
                    ]}
                }
            }
        })
    }

    #[test]
    fn raw_path_next_to_output() {
        assert_eq!(
            raw_responses_path(Path::new("out/plan.json")),
            PathBuf::from("out/plan_raw_responses.json")
        );
        assert_eq!(
            raw_responses_path(Path::new("plan")),
            PathBuf::from("plan_raw_responses.json")
        );
    }

    #[test]
    fn error_report_is_structured() {
        let err = RunError::Plan(PlanError::MissingAccommodation);
        let report = err.to_json();
        assert!(
            report["error"]
                .as_str()
                .unwrap()
                .contains("accommodation")
        );
    }

    #[tokio::test]
    async fn document_gets_timing() {
        let log = ResponseLog::new();
        let processed = process_document(
            &provider(),
            &PipelineConfig::default(),
            &log,
            &document(),
            None,
        )
        .await
        .unwrap();

        assert!(processed.document["processing_time_seconds"].is_f64());
        assert_eq!(processed.summary.days_processed, 1);
        assert_eq!(processed.summary.total_connections, 1);
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn file_run_writes_output_and_raw_log() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("itinerary.json");
        let output = dir.path().join("nested").join("plan.json");
        std::fs::write(&input, document().to_string()).unwrap();

        let summary = process_file(&provider(), &PipelineConfig::default(), &input, &output, None)
            .await
            .unwrap();
        assert_eq!(summary.total_connections, 1);

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            written["transport"]["2025-06-01"]["connections"][0]["transport_modes"][0]["mode"],
            "walk"
        );

        let raw: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("nested/plan_raw_responses.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["total_requests"], 1);
    }

    #[tokio::test]
    async fn unreadable_and_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("plan.json");
        let config = PipelineConfig::default();

        let missing = process_file(&provider(), &config, &dir.path().join("nope.json"), &output, None).await;
        assert!(matches!(missing, Err(RunError::Read { .. })));

        let input = dir.path().join("bad.json");
        std::fs::write(&input, "{not json").unwrap();
        let bad = process_file(&provider(), &config, &input, &output, None).await;
        assert!(matches!(bad, Err(RunError::Parse { .. })));

        std::fs::write(&input, r#"{"itinerary": {}}"#).unwrap();
        let no_home = process_file(&provider(), &config, &input, &output, None).await;
        assert!(matches!(
            no_home,
            Err(RunError::Plan(PlanError::MissingAccommodation))
        ));
        assert!(!output.exists());
    }
}
