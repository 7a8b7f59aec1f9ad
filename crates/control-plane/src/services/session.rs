// Wellness session service
//
// Owns validation and the save-draft/publish upsert; storage is reached
// only through the SessionStore trait.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;
use wellness_core::{SessionDraft, SessionStatus, SessionStore, StoreError, WellnessSession};

/// Unvalidated fields for a save-draft or publish call
#[derive(Debug, Clone, Default)]
pub struct SaveSessionInput {
    /// Existing session to overwrite; `None` creates a new one
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub content: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum SessionServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Session not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SessionServiceError>;

pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn list_published(&self) -> Result<Vec<WellnessSession>> {
        Ok(self.store.list_published().await?)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WellnessSession>> {
        Ok(self.store.list_for_user(user_id).await?)
    }

    pub async fn get(&self, id: Uuid, user_id: Uuid) -> Result<WellnessSession> {
        self.store
            .get(id, user_id)
            .await?
            .ok_or(SessionServiceError::NotFound)
    }

    /// Create a session, or overwrite one the caller owns, with the given status.
    pub async fn save(
        &self,
        user_id: Uuid,
        req: SaveSessionInput,
        status: SessionStatus,
    ) -> Result<WellnessSession> {
        let id = req.id;
        let draft = Self::validate(req, status)?;

        let session = match id {
            Some(id) => self
                .store
                .update(id, user_id, draft)
                .await?
                .ok_or(SessionServiceError::NotFound)?,
            None => self.store.create(user_id, draft).await?,
        };

        tracing::info!(
            session_id = %session.id,
            user_id = %user_id,
            status = %session.status,
            "Session saved"
        );
        Ok(session)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        if self.store.delete(id, user_id).await? {
            tracing::info!(session_id = %id, user_id = %user_id, "Session deleted");
            Ok(())
        } else {
            Err(SessionServiceError::NotFound)
        }
    }

    fn validate(req: SaveSessionInput, status: SessionStatus) -> Result<SessionDraft> {
        let title = required_text(req.title, "Title is required")?;
        let description = required_text(req.description, "Description is required")?;
        let duration = req
            .duration
            .ok_or_else(|| SessionServiceError::Validation("Duration is required".to_string()))?;
        if duration < 1 {
            return Err(SessionServiceError::Validation(
                "Session must be at least 1 minutes".to_string(),
            ));
        }
        let content = req
            .content
            .filter(|c| !c.is_null())
            .ok_or_else(|| {
                SessionServiceError::Validation("Session content is required".to_string())
            })?;

        Ok(SessionDraft {
            title,
            description,
            duration,
            tags: req.tags.unwrap_or_default(),
            content,
            status,
        })
    }
}

fn required_text(value: Option<String>, message: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SessionServiceError::Validation(message.to_string()))
}
