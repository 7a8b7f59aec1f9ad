// Wellness session domain types
//
// These types represent the WellnessSession entity and its publication status.
// Used by both the storage and control-plane crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Publication status of a wellness session.
/// - `draft`: Visible only to its owner
/// - `published`: Listed on the public endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Visible only to its owner.
    #[default]
    Draft,
    /// Listed on the public endpoint.
    Published,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Draft => "draft",
            SessionStatus::Published => "published",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SessionStatus {
    fn from(s: &str) -> Self {
        match s {
            "published" => SessionStatus::Published,
            _ => SessionStatus::Draft,
        }
    }
}

/// WellnessSession - a piece of guided content owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct WellnessSession {
    /// Unique identifier for the session.
    pub id: Uuid,
    /// ID of the user who owns the session.
    pub user_id: Uuid,
    /// Human-readable title.
    pub title: String,
    /// Short description shown in listings.
    pub description: String,
    /// Length of the session in minutes.
    pub duration: i32,
    /// Tags for organizing and filtering sessions.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Session content as a JSON object.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub content: serde_json::Value,
    /// Publication status.
    pub status: SessionStatus,
    /// Timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the session was last saved.
    pub updated_at: DateTime<Utc>,
}

/// Fields written by save-draft and publish
#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub tags: Vec<String>,
    pub content: serde_json::Value,
    pub status: SessionStatus,
}
