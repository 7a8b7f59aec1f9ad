// Core traits for pluggable backends
//
// These traits allow the auth service to be used with different backends:
// - In-memory implementations for dev mode and testing
// - PostgreSQL implementations for production

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::session::{SessionDraft, WellnessSession};
use crate::token::{NewToken, StoredToken};
use crate::user::{NewUser, User};

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ============================================================================
// CredentialStore - User identities
// ============================================================================

/// Trait for persisting user identities
///
/// Implementations must enforce email uniqueness themselves and report a
/// losing concurrent insert as [`StoreError::Conflict`].
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a user; `email` is already normalized
    async fn create_user(&self, input: NewUser) -> StoreResult<User>;

    /// Look up a user by normalized email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Look up a user by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
}

// ============================================================================
// TokenStore - Issued bearer tokens
// ============================================================================

/// Trait for persisting issued tokens
///
/// Records are keyed by the token hash, never the raw bearer value.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Append a token record. Duplicates are tolerated.
    async fn insert(&self, input: NewToken) -> StoreResult<StoredToken>;

    /// Return the record matching `token_hash` and `user_id` if it expires after `now`
    async fn find_active(
        &self,
        token_hash: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredToken>>;

    /// Delete every record matching `token_hash` and `user_id`; returns the count
    async fn revoke(&self, token_hash: &str, user_id: Uuid) -> StoreResult<u64>;

    /// Delete records whose expiry is at or before `now`; returns the count
    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64>;
}

// ============================================================================
// SessionStore - Wellness session content
// ============================================================================

/// Trait for storing wellness sessions
///
/// Every owner-scoped method matches on both `id` and `user_id`, so a
/// session owned by someone else looks exactly like a missing one.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, user_id: Uuid, draft: SessionDraft) -> StoreResult<WellnessSession>;

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        draft: SessionDraft,
    ) -> StoreResult<Option<WellnessSession>>;

    async fn get(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<WellnessSession>>;

    /// Published sessions from all users, newest first
    async fn list_published(&self) -> StoreResult<Vec<WellnessSession>>;

    /// All of one user's sessions, newest first
    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<WellnessSession>>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool>;
}
