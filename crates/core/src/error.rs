// Error types for the auth core

use thiserror::Error;

/// Result type alias for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors surfaced by store implementations.
///
/// Backends translate their native failures into one of these so the auth
/// service can tell a uniqueness conflict apart from an outage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store could not be reached or failed the query
    #[error("Store unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        StoreError::Conflict(msg.into())
    }

    /// Wrap any backend error as unavailable
    pub fn unavailable(err: impl Into<anyhow::Error>) -> Self {
        StoreError::Unavailable(err.into())
    }
}

/// Outcomes of the authentication lifecycle.
///
/// Every lower-level failure (hash mismatch, codec rejection, store miss) is
/// converted into one of these before it leaves [`crate::AuthService`].
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Registration with an email that already exists
    #[error("User already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token on the request
    #[error("Access denied. No token provided.")]
    MissingToken,

    /// Bad signature or unparseable token
    #[error("Invalid token.")]
    InvalidToken,

    /// Token expiry has passed
    #[error("Token has expired.")]
    Expired,

    /// Token is well-formed and unexpired but has no active record
    #[error("Token has been revoked or expired.")]
    Revoked,

    /// Authenticated user no longer exists
    #[error("User not found")]
    UserNotFound,

    /// Store failure
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// Hashing or signing failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AuthError::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AuthError::Internal(msg.into())
    }

    /// True for failures the caller can fix by changing the request
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            AuthError::StoreUnavailable(_) | AuthError::Internal(_)
        )
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::StoreUnavailable(err)
    }
}
