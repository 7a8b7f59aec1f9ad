// OpenAPI specification generation
//
// This module defines the OpenAPI spec for the Wellness API.
// It can be used by both the main API server (for Swagger UI)
// and the export-openapi binary (for static spec generation).

use crate::api;
use crate::api::{ErrorResponse, ListResponse, SuccessResponse};
use crate::auth::routes as auth_routes;
use utoipa::OpenApi;
use wellness_core::{SessionStatus, UserProfile, WellnessSession};

/// OpenAPI documentation for the Wellness API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::system::root,
        api::system::health,
        auth_routes::register,
        auth_routes::login,
        auth_routes::logout,
        auth_routes::profile,
        api::sessions::list_published_sessions,
        api::sessions::list_my_sessions,
        api::sessions::save_draft,
        api::sessions::publish,
        api::sessions::get_my_session,
        api::sessions::delete_my_session,
    ),
    components(
        schemas(
            UserProfile,
            WellnessSession, SessionStatus,
            ListResponse<WellnessSession>,
            ErrorResponse, SuccessResponse,
            auth_routes::CredentialsRequest, auth_routes::LoginResponse,
            api::sessions::SaveSessionRequest,
            api::system::RootResponse, api::system::HealthResponse,
            api::system::NotFoundResponse,
        )
    ),
    tags(
        (name = "system", description = "Service status endpoints"),
        (name = "auth", description = "Registration, login, logout and profile"),
        (name = "sessions", description = "Wellness session endpoints")
    ),
    info(
        title = "Wellness Session Platform API",
        version = "0.1.0",
        description = "API for registering users and managing wellness sessions",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}
