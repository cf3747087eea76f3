//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::domain::Location;
use crate::pipeline::PlanError;
use crate::routes::{ResponseLog, RouteProvider};
use crate::run::process_document;

use super::state::AppState;

/// Create the application router.
pub fn create_router<P: RouteProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/transport", post(plan_transport::<P>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Query parameters for `POST /transport`.
#[derive(Debug, Default, Deserialize)]
pub struct TransportParams {
    /// Accommodation as `lat,lon`, overriding the document's own.
    pub accommodation: Option<String>,
}

/// Plan transport for an itinerary document.
async fn plan_transport<P: RouteProvider + 'static>(
    State(state): State<AppState<P>>,
    Query(params): Query<TransportParams>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let document: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejecting unparseable itinerary");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let accommodation = params
        .accommodation
        .as_deref()
        .map(str::parse::<Location>)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: format!("Invalid accommodation: {e}"),
        })?;

    // Raw responses are only dumped for file runs
    let log = ResponseLog::new();
    let processed = process_document(
        state.provider.as_ref(),
        &state.config,
        &log,
        &document,
        accommodation,
    )
    .await?;

    info!(
        days = processed.summary.days_processed,
        connections = processed.summary.total_connections,
        requests = log.len(),
        "planned transport"
    );

    Ok(Json(processed.document))
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Serialize(_) => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
