//! Health check endpoints
//!
//! - GET /health/database - Report connectivity of the active backend

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::api::middleware::AppState;

/// Health report for the active database backend
#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub status: String,
    #[serde(rename = "type")]
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub database: DatabaseHealth,
    pub timestamp: String,
}

/// Build public health routes
pub fn router() -> Router<AppState> {
    Router::new().route("/database", get(database_health))
}

/// GET /health/database - Ping the active backend
///
/// Returns 200 with `connected` when the ping succeeds, 503 with
/// `disconnected` and the error message otherwise.
async fn database_health(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.pool.kind().to_string();

    let (status, database) = match state.pool.ping().await {
        Ok(()) => (
            StatusCode::OK,
            DatabaseHealth {
                status: "connected".to_string(),
                backend,
                message: None,
            },
        ),
        Err(e) => {
            tracing::warn!("Database health check failed: {:#}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                DatabaseHealth {
                    status: "disconnected".to_string(),
                    backend,
                    message: Some(e.to_string()),
                },
            )
        }
    };

    (
        status,
        Json(HealthResponse {
            database,
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}
