// Authentication HTTP routes
// Decision: Use /api/auth/* for all auth endpoints
// Decision: Handlers stay thin; AuthService owns validation and token lifecycle

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use wellness_core::UserProfile;

use super::middleware::{AuthState, AuthUser};
use crate::api::common::{ApiError, ApiJson, ErrorResponse, SuccessResponse};

/// Credentials for register and login
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(example = "hunter2")]
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn parts(&self) -> (&str, &str) {
        (
            self.email.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        )
    }
}

/// Login response carrying the bearer token
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    /// Bearer token for the Authorization header
    pub token: String,
    /// When the token stops being accepted
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

/// Create auth routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/profile", get(profile))
        .with_state(state)
}

/// POST /api/auth/register - Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User registered", body = SuccessResponse),
        (status = 400, description = "Validation failure or duplicate email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    let (email, password) = req.parts();
    state.service.register(email, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new("User registered successfully")),
    ))
}

/// POST /api/auth/login - Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (email, password) = req.parts();
    let issued = state.service.login(email, password).await?;

    Ok(Json(LoginResponse {
        success: true,
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// POST /api/auth/logout - Revoke the presented token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Token revoked", body = SuccessResponse),
        (status = 401, description = "Missing, expired or revoked token", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AuthState>,
    user: AuthUser,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.service.logout(user.identity()).await?;
    Ok(Json(SuccessResponse::new("Logged out successfully")))
}

/// GET /api/auth/profile - Current user's public profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Profile of the caller", body = UserProfile),
        (status = 401, description = "Missing, expired or revoked token", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn profile(
    State(state): State<AuthState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state.service.profile(user.identity()).await?;
    Ok(Json(user.profile()))
}
