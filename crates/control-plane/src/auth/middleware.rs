// Authentication middleware and extractors
// Decision: Bearer header only; the gate delegates every check to AuthService
// Decision: Rejections use the shared ApiError body so handlers never run on failure

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;
use uuid::Uuid;
use wellness_core::{AuthService, AuthenticatedIdentity};

use crate::api::common::ApiError;

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub service: Arc<AuthService>,
}

impl AuthState {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

/// Authenticated caller extracted from the request.
/// Returns 401/403 before the handler runs if the bearer token is not accepted.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedIdentity);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.user_id()
    }

    pub fn identity(&self) -> &AuthenticatedIdentity {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        // A header that is not valid visible ASCII cannot carry a token
        let header_value = match parts.headers.get(header::AUTHORIZATION) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| ApiError::from(wellness_core::AuthError::InvalidToken))?,
            ),
            None => None,
        };

        let identity = auth_state
            .service
            .authenticate(header_value)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Request rejected by auth gate");
                ApiError::from(e)
            })?;

        Ok(AuthUser(identity))
    }
}

/// Helper trait for extracting AuthState from application state
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AuthState> for AuthState {
    fn from_ref(input: &AuthState) -> Self {
        input.clone()
    }
}
