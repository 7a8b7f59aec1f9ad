// Router assembly
//
// Shared by the server binary and the HTTP tests so both exercise the same
// routes, fallback and layers.

use axum::http::{header, Method};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wellness_core::AuthService;

use crate::api::{self, sessions::SessionsState, system::HealthState};
use crate::auth::{self, AuthState};
use crate::config::ServerConfig;
use crate::openapi::ApiDoc;
use crate::storage::StorageBackend;

/// Build the full application router
pub fn build_app(
    backend: &StorageBackend,
    auth_service: Arc<AuthService>,
    config: &ServerConfig,
) -> Router {
    let auth_state = AuthState::new(auth_service);
    let sessions_state = SessionsState::new(backend.session_store(), auth_state.clone());
    let health_state = HealthState {
        storage: backend.kind().to_string(),
    };

    let api_routes = Router::new()
        .merge(auth::routes(auth_state))
        .merge(api::sessions::routes(sessions_state));

    // Root and health are never prefixed
    let app = Router::new()
        .route("/", get(api::system::root))
        .route("/health", get(api::system::health).with_state(health_state))
        .merge(build_router_with_prefix(api_routes, &config.api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(api::system::not_found);

    // Add CORS layer only if origins are configured
    let app = if !config.cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    let app = if config.development {
        app.layer(middleware::map_response(api::common::expose_error_details))
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
