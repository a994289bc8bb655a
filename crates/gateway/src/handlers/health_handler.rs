//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tracing::error;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub registry: RegistryHealth,
}

/// Registry size, or the error reading it.
#[derive(Debug, Serialize)]
pub struct RegistryHealth {
    pub accounts: usize,
    pub users: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint - reads the registry.
pub async fn health_check(State(state): State<AppState>) -> Response {
    match state.services.dashboard.stats().await {
        Ok(stats) => {
            let response = HealthResponse {
                status: "healthy".to_string(),
                registry: RegistryHealth {
                    accounts: stats.total_accounts,
                    users: stats.total_users,
                    error: None,
                },
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Registry unavailable");
            let response = HealthResponse {
                status: "unhealthy".to_string(),
                registry: RegistryHealth {
                    accounts: 0,
                    users: 0,
                    error: Some(e.to_string()),
                },
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
        }
    }
}
