// Token domain types
//
// Only the SHA-256 hash of a bearer token is ever persisted; the raw value
// leaves the process exactly once, in the login response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Claims embedded in a signed bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token ID, so two tokens issued in the same second still differ
    pub jti: Uuid,
}

/// Token record as held by a [`crate::TokenStore`]
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Input for inserting a token record
#[derive(Debug, Clone)]
pub struct NewToken {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Signed bearer value
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Identity resolved from a validated bearer token.
///
/// Only [`crate::AuthService::authenticate`] constructs this, so holding one
/// proves the token passed both the codec and the store check.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
}

impl AuthenticatedIdentity {
    pub(crate) fn new(user_id: Uuid, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token_hash,
            expires_at,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub(crate) fn token_hash(&self) -> &str {
        &self.token_hash
    }
}

/// Hash a token for storage (using SHA-256)
pub fn hash_token(token: &str) -> String {
    let hash = Sha256::digest(token.as_bytes());
    hex::encode(hash)
}

/// Extract the bearer value from an `Authorization` header.
///
/// The scheme is matched case-insensitively. Returns `None` for a missing
/// header, another scheme, or an empty value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let header = header?.trim();
    let (scheme, value) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
