//! Request handlers and their response bodies.
//!
//! # Responsibilities
//! - Probe: report health through the HTTP status code itself (200/500)
//! - Query: report the current flag as JSON
//! - Toggle: flip the flag and confirm the new value
//! - Fallback: descriptive 404 for any unmatched method/path
//!
//! # Design Decisions
//! - Handlers only touch the injected `HealthFlag`; no hidden globals
//! - Each response timestamp is captured independently at response time
//! - Toggling cannot fail, so no handler returns an error

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::health::HealthFlag;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub health: HealthFlag,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            health: HealthFlag::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub message: &'static str,
}

/// Body of `GET /api/health-status`.
#[derive(Debug, Serialize)]
pub struct HealthStatusResponse {
    pub status: &'static str,
    #[serde(rename = "isHealthy")]
    pub is_healthy: bool,
}

/// Body of `POST /api/toggle-health`.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub status: &'static str,
    pub message: String,
}

/// Body of the 404 fallback.
#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub message: String,
    pub timestamp: String,
}

fn status_label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}

fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `GET /health` — the probe whose status code itself encodes health.
pub async fn probe(State(state): State<AppState>) -> Response {
    if state.health.get() {
        (
            StatusCode::OK,
            Json(ProbeResponse {
                status: "healthy",
                timestamp: iso_timestamp(),
                message: "Service is running normally",
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ProbeResponse {
                status: "unhealthy",
                timestamp: iso_timestamp(),
                message: "Service is experiencing issues",
            }),
        )
            .into_response()
    }
}

/// `GET /api/health-status` — current flag as JSON.
pub async fn health_status(State(state): State<AppState>) -> Json<HealthStatusResponse> {
    let healthy = state.health.get();
    Json(HealthStatusResponse {
        status: status_label(healthy),
        is_healthy: healthy,
    })
}

/// `POST /api/toggle-health` — flip the flag, confirm the new value.
pub async fn toggle_health(State(state): State<AppState>) -> Json<ToggleResponse> {
    let healthy = state.health.toggle();
    let status = status_label(healthy);

    tracing::info!(
        from = status_label(!healthy),
        to = status,
        "Health status toggled"
    );

    Json(ToggleResponse {
        status,
        message: format!("Health status changed to {status}"),
    })
}

/// Fallback for any unmatched method/path pair.
pub async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<NotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Not Found",
            message: format!("Route {} {} not found", method, uri.path()),
            timestamp: iso_timestamp(),
        }),
    )
}
