// Service-level routes: welcome banner, health check, 404 fallback

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Root route response
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    /// Route groups served by this API
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "postgres" or "memory"
    pub storage: String,
}

/// Body for unmatched routes
#[derive(Debug, Serialize, ToSchema)]
pub struct NotFoundResponse {
    pub message: String,
    pub path: String,
    pub method: String,
}

/// State for health endpoint
#[derive(Clone)]
pub struct HealthState {
    pub storage: String,
}

/// GET / - Welcome message and endpoint map
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "API is running", body = RootResponse)
    ),
    tag = "system"
)]
pub async fn root() -> Json<RootResponse> {
    let endpoints = BTreeMap::from([
        ("auth".to_string(), "/api/auth/*".to_string()),
        ("sessions".to_string(), "/api/sessions".to_string()),
        ("mySessions".to_string(), "/api/my-sessions/*".to_string()),
    ]);

    Json(RootResponse {
        message: "Welcome to the Wellness Session Platform API".to_string(),
        status: "running".to_string(),
        endpoints,
    })
}

/// GET /health - Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.storage.clone(),
    })
}

/// Fallback for unmatched routes
pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    tracing::debug!(%method, path = %uri.path(), "Route not found");
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            message: "Route not found".to_string(),
            path: uri.path().to_string(),
            method: method.to_string(),
        }),
    )
}
