// Wellness Auth Core
//
// This crate provides the DB-agnostic and HTTP-agnostic authentication core
// for the wellness sessions API.
//
// Key design decisions:
// - Uses traits (CredentialStore, TokenStore, SessionStore) for pluggable backends
// - Stores and the signing secret are injected into AuthService at construction
// - Token verification is local (codec) first, then a fresh store lookup
// - Logout deletes the token record; nothing else can revoke a token early
// - Domain entity types (User, StoredToken, WellnessSession) are defined here

// Domain entity types
pub mod session;
pub mod token;
pub mod user;

pub mod auth;
pub mod codec;
pub mod error;
pub mod password;
pub mod traits;

// Telemetry (tracing subscriber setup)
pub mod telemetry;

// In-memory implementations for dev mode and testing
pub mod memory;

// Re-exports for convenience
pub use auth::{AuthService, AuthSettings, DEFAULT_TOKEN_LIFETIME};
pub use codec::{CodecError, TokenCodec};
pub use error::{AuthError, Result, StoreError};
pub use memory::{InMemoryCredentialStore, InMemorySessionStore, InMemoryTokenStore};
pub use password::{PasswordHasher, DEFAULT_MIN_PASSWORD_LENGTH};
pub use session::{SessionDraft, SessionStatus, WellnessSession};
pub use token::{AuthenticatedIdentity, IssuedToken, NewToken, StoredToken, TokenClaims};
pub use traits::{CredentialStore, SessionStore, StoreResult, TokenStore};
pub use user::{NewUser, User, UserProfile};
