// Wellness session HTTP routes
// Decision: Public listing under /api/sessions, owner-scoped routes under /api/my-sessions
// Decision: save-draft and publish share one upsert; the route fixes the status

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use wellness_core::{SessionStatus, SessionStore, WellnessSession};

use super::common::{ApiError, ApiJson, ApiPath, ErrorResponse, ListResponse, SuccessResponse};
use crate::auth::middleware::{AuthState, AuthUser, FromRef};
use crate::services::{SaveSessionInput, SessionService, SessionServiceError};

/// Request body for save-draft and publish.
/// With `id`, the caller's existing session is overwritten; without it a new one is created.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveSessionRequest {
    /// Existing session to update. Must be owned by the caller.
    #[serde(default, alias = "_id")]
    pub id: Option<Uuid>,
    #[schema(example = "Morning breathing")]
    pub title: Option<String>,
    #[schema(example = "Ten minutes of box breathing")]
    pub description: Option<String>,
    /// Length in minutes, at least 1.
    #[schema(example = 10)]
    pub duration: Option<i32>,
    #[schema(example = json!(["breathing", "morning"]))]
    pub tags: Option<Vec<String>>,
    /// Session content as a JSON object.
    #[schema(value_type = Object)]
    pub content: Option<serde_json::Value>,
}

impl From<SaveSessionRequest> for SaveSessionInput {
    fn from(req: SaveSessionRequest) -> Self {
        Self {
            id: req.id,
            title: req.title,
            description: req.description,
            duration: req.duration,
            tags: req.tags,
            content: req.content,
        }
    }
}

/// App state for session routes
#[derive(Clone)]
pub struct SessionsState {
    pub service: Arc<SessionService>,
    pub auth: AuthState,
}

impl SessionsState {
    pub fn new(store: Arc<dyn SessionStore>, auth: AuthState) -> Self {
        Self {
            service: Arc::new(SessionService::new(store)),
            auth,
        }
    }
}

impl FromRef<SessionsState> for AuthState {
    fn from_ref(input: &SessionsState) -> Self {
        input.auth.clone()
    }
}

impl From<SessionServiceError> for ApiError {
    fn from(err: SessionServiceError) -> Self {
        match err {
            SessionServiceError::Validation(message) => ApiError::bad_request(message),
            SessionServiceError::NotFound => ApiError::not_found("Session not found"),
            SessionServiceError::Store(e) => {
                tracing::error!(error = %e, "Session store failure");
                ApiError::internal(e)
            }
        }
    }
}

/// Create session routes
pub fn routes(state: SessionsState) -> Router {
    Router::new()
        .route("/api/sessions", get(list_published_sessions))
        .route("/api/my-sessions", get(list_my_sessions))
        .route("/api/my-sessions/save-draft", post(save_draft))
        .route("/api/my-sessions/publish", post(publish))
        .route(
            "/api/my-sessions/:id",
            get(get_my_session).delete(delete_my_session),
        )
        .with_state(state)
}

/// GET /api/sessions - Published sessions from all users
#[utoipa::path(
    get,
    path = "/api/sessions",
    responses(
        (status = 200, description = "Published sessions, newest first", body = ListResponse<WellnessSession>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn list_published_sessions(
    State(state): State<SessionsState>,
) -> Result<Json<ListResponse<WellnessSession>>, ApiError> {
    let sessions = state.service.list_published().await?;
    Ok(Json(ListResponse::new(sessions)))
}

/// GET /api/my-sessions - Caller's sessions, draft and published
#[utoipa::path(
    get,
    path = "/api/my-sessions",
    responses(
        (status = 200, description = "Caller's sessions, newest first", body = ListResponse<WellnessSession>),
        (status = 401, description = "Missing, expired or revoked token", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn list_my_sessions(
    State(state): State<SessionsState>,
    user: AuthUser,
) -> Result<Json<ListResponse<WellnessSession>>, ApiError> {
    let sessions = state.service.list_for_user(user.id()).await?;
    Ok(Json(ListResponse::new(sessions)))
}

/// POST /api/my-sessions/save-draft - Create or update a draft
#[utoipa::path(
    post,
    path = "/api/my-sessions/save-draft",
    request_body = SaveSessionRequest,
    responses(
        (status = 200, description = "Draft saved", body = WellnessSession),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 401, description = "Missing, expired or revoked token", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn save_draft(
    State(state): State<SessionsState>,
    user: AuthUser,
    ApiJson(req): ApiJson<SaveSessionRequest>,
) -> Result<Json<WellnessSession>, ApiError> {
    let session = state
        .service
        .save(user.id(), req.into(), SessionStatus::Draft)
        .await?;
    Ok(Json(session))
}

/// POST /api/my-sessions/publish - Create or update a session and publish it
#[utoipa::path(
    post,
    path = "/api/my-sessions/publish",
    request_body = SaveSessionRequest,
    responses(
        (status = 200, description = "Session published", body = WellnessSession),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 401, description = "Missing, expired or revoked token", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn publish(
    State(state): State<SessionsState>,
    user: AuthUser,
    ApiJson(req): ApiJson<SaveSessionRequest>,
) -> Result<Json<WellnessSession>, ApiError> {
    let session = state
        .service
        .save(user.id(), req.into(), SessionStatus::Published)
        .await?;
    Ok(Json(session))
}

/// GET /api/my-sessions/{id} - One of the caller's sessions
#[utoipa::path(
    get,
    path = "/api/my-sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session found", body = WellnessSession),
        (status = 400, description = "Malformed session ID", body = ErrorResponse),
        (status = 401, description = "Missing, expired or revoked token", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn get_my_session(
    State(state): State<SessionsState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<WellnessSession>, ApiError> {
    let session = state.service.get(id, user.id()).await?;
    Ok(Json(session))
}

/// DELETE /api/my-sessions/{id} - Delete one of the caller's sessions
#[utoipa::path(
    delete,
    path = "/api/my-sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session deleted", body = SuccessResponse),
        (status = 400, description = "Malformed session ID", body = ErrorResponse),
        (status = 401, description = "Missing, expired or revoked token", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn delete_my_session(
    State(state): State<SessionsState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.service.delete(id, user.id()).await?;
    Ok(Json(SuccessResponse::new("Session deleted successfully")))
}
