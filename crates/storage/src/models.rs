// Database models (internal, may differ from domain types)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use wellness_core::{SessionStatus, StoredToken, User, WellnessSession};

// ============================================
// Auth models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AuthTokenRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<AuthTokenRow> for StoredToken {
    fn from(row: AuthTokenRow) -> Self {
        StoredToken {
            id: row.id,
            user_id: row.user_id,
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

// ============================================
// Wellness session models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct WellnessSessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub tags: Vec<String>,
    pub content: sqlx::types::JsonValue,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WellnessSessionRow> for WellnessSession {
    fn from(row: WellnessSessionRow) -> Self {
        WellnessSession {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            duration: row.duration,
            tags: row.tags,
            content: row.content,
            status: SessionStatus::from(row.status.as_str()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
