// In-memory implementations for dev mode and testing
// Decision: Use parking_lot for thread-safe access (no lock is held across an await)
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// All data is stored in memory and lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::session::{SessionDraft, SessionStatus, WellnessSession};
use crate::token::{NewToken, StoredToken};
use crate::traits::{CredentialStore, SessionStore, StoreResult, TokenStore};
use crate::user::{NewUser, User};

// ============================================================================
// InMemoryCredentialStore
// ============================================================================

/// In-memory user store
///
/// Users are keyed by ID with a secondary email index. Both maps are updated
/// under one write lock, which is what makes email uniqueness race-free.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    inner: Arc<RwLock<UserTables>>,
}

#[derive(Debug, Default)]
struct UserTables {
    by_id: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_user(&self, input: NewUser) -> StoreResult<User> {
        let mut tables = self.inner.write();
        if tables.by_email.contains_key(&input.email) {
            return Err(StoreError::conflict(format!(
                "email {} already registered",
                input.email
            )));
        }

        let user = User {
            id: Uuid::now_v7(),
            email: input.email,
            password_hash: input.password_hash,
            created_at: Utc::now(),
        };
        tables.by_email.insert(user.email.clone(), user.id);
        tables.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.inner.read();
        Ok(tables
            .by_email
            .get(email)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().by_id.get(&id).cloned())
    }
}

// ============================================================================
// InMemoryTokenStore
// ============================================================================

/// In-memory token store
#[derive(Debug, Default, Clone)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<Uuid, StoredToken>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, expired or not
    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn insert(&self, input: NewToken) -> StoreResult<StoredToken> {
        let row = StoredToken {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            token_hash: input.token_hash,
            expires_at: input.expires_at,
            created_at: Utc::now(),
        };
        self.tokens.write().insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_active(
        &self,
        token_hash: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredToken>> {
        Ok(self
            .tokens
            .read()
            .values()
            .find(|t| t.token_hash == token_hash && t.user_id == user_id && t.is_active_at(now))
            .cloned())
    }

    async fn revoke(&self, token_hash: &str, user_id: Uuid) -> StoreResult<u64> {
        let mut tokens = self.tokens.write();
        let before = tokens.len();
        tokens.retain(|_, t| !(t.token_hash == token_hash && t.user_id == user_id));
        Ok((before - tokens.len()) as u64)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let mut tokens = self.tokens.write();
        let before = tokens.len();
        tokens.retain(|_, t| t.is_active_at(now));
        Ok((before - tokens.len()) as u64)
    }
}

// ============================================================================
// InMemorySessionStore
// ============================================================================

/// In-memory wellness session store
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, WellnessSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut sessions: Vec<WellnessSession>) -> Vec<WellnessSession> {
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        sessions
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user_id: Uuid, draft: SessionDraft) -> StoreResult<WellnessSession> {
        let now = Utc::now();
        let session = WellnessSession {
            id: Uuid::now_v7(),
            user_id,
            title: draft.title,
            description: draft.description,
            duration: draft.duration,
            tags: draft.tags,
            content: draft.content,
            status: draft.status,
            created_at: now,
            updated_at: now,
        };
        self.sessions.write().insert(session.id, session.clone());
        Ok(session)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        draft: SessionDraft,
    ) -> StoreResult<Option<WellnessSession>> {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(&id) {
            Some(session) if session.user_id == user_id => {
                session.title = draft.title;
                session.description = draft.description;
                session.duration = draft.duration;
                session.tags = draft.tags;
                session.content = draft.content;
                session.status = draft.status;
                session.updated_at = Utc::now();
                Ok(Some(session.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<WellnessSession>> {
        Ok(self
            .sessions
            .read()
            .get(&id)
            .filter(|s| s.user_id == user_id)
            .cloned())
    }

    async fn list_published(&self) -> StoreResult<Vec<WellnessSession>> {
        let sessions = self
            .sessions
            .read()
            .values()
            .filter(|s| s.status == SessionStatus::Published)
            .cloned()
            .collect();
        Ok(Self::newest_first(sessions))
    }

    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<WellnessSession>> {
        let sessions = self
            .sessions
            .read()
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(sessions))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut sessions = self.sessions.write();
        if sessions.get(&id).is_some_and(|s| s.user_id == user_id) {
            sessions.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::hash_token;
    use chrono::Duration;

    fn draft(title: &str, status: SessionStatus) -> SessionDraft {
        SessionDraft {
            title: title.to_string(),
            description: "desc".to_string(),
            duration: 10,
            tags: vec!["calm".to_string()],
            content: serde_json::json!({"steps": []}),
            status,
        }
    }

    #[tokio::test]
    async fn test_credential_store_uniqueness() {
        let store = InMemoryCredentialStore::new();
        let input = NewUser {
            email: "bob@x.com".to_string(),
            password_hash: "h".to_string(),
        };

        let user = store.create_user(input.clone()).await.unwrap();
        assert_eq!(store.find_by_email("bob@x.com").await.unwrap().unwrap().id, user.id);
        assert!(store.find_by_id(user.id).await.unwrap().is_some());

        let err = store.create_user(input).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_registration_single_winner() {
        let store = InMemoryCredentialStore::new();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create_user(NewUser {
                        email: "race@x.com".to_string(),
                        password_hash: "h".to_string(),
                    })
                    .await
            }));
        }

        let mut ok = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(StoreError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 15);
    }

    #[tokio::test]
    async fn test_token_store_lifecycle() {
        let store = InMemoryTokenStore::new();
        let user_id = Uuid::now_v7();
        let now = Utc::now();
        let hash = hash_token("abc");

        store
            .insert(NewToken {
                user_id,
                token_hash: hash.clone(),
                expires_at: now + Duration::hours(1),
            })
            .await
            .unwrap();

        assert!(store.find_active(&hash, user_id, now).await.unwrap().is_some());
        // Wrong owner
        assert!(store
            .find_active(&hash, Uuid::now_v7(), now)
            .await
            .unwrap()
            .is_none());
        // Past expiry
        assert!(store
            .find_active(&hash, user_id, now + Duration::hours(2))
            .await
            .unwrap()
            .is_none());

        assert_eq!(store.revoke(&hash, user_id).await.unwrap(), 1);
        assert!(store.find_active(&hash, user_id, now).await.unwrap().is_none());
        assert_eq!(store.revoke(&hash, user_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_token_store_tolerates_duplicates() {
        let store = InMemoryTokenStore::new();
        let user_id = Uuid::now_v7();
        let input = NewToken {
            user_id,
            token_hash: hash_token("dup"),
            expires_at: Utc::now() + Duration::hours(1),
        };

        store.insert(input.clone()).await.unwrap();
        store.insert(input.clone()).await.unwrap();
        assert_eq!(store.len(), 2);

        // Revocation clears every copy
        assert_eq!(store.revoke(&input.token_hash, user_id).await.unwrap(), 2);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_token_store_purge() {
        let store = InMemoryTokenStore::new();
        let now = Utc::now();
        for (name, offset) in [("old", -10), ("edge", 0), ("fresh", 10)] {
            store
                .insert(NewToken {
                    user_id: Uuid::now_v7(),
                    token_hash: hash_token(name),
                    expires_at: now + Duration::seconds(offset),
                })
                .await
                .unwrap();
        }

        assert_eq!(store.purge_expired(now).await.unwrap(), 2);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_session_store_ownership() {
        let store = InMemorySessionStore::new();
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();

        let session = store
            .create(owner, draft("Morning", SessionStatus::Draft))
            .await
            .unwrap();

        assert!(store.get(session.id, owner).await.unwrap().is_some());
        assert!(store.get(session.id, stranger).await.unwrap().is_none());
        assert!(store
            .update(session.id, stranger, draft("Hijack", SessionStatus::Published))
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(session.id, stranger).await.unwrap());

        let updated = store
            .update(session.id, owner, draft("Evening", SessionStatus::Published))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Evening");
        assert_eq!(updated.status, SessionStatus::Published);
        assert_eq!(updated.created_at, session.created_at);

        assert!(store.delete(session.id, owner).await.unwrap());
        assert!(store.get(session.id, owner).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_store_listing() {
        let store = InMemorySessionStore::new();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();

        store.create(alice, draft("a-draft", SessionStatus::Draft)).await.unwrap();
        store.create(alice, draft("a-pub", SessionStatus::Published)).await.unwrap();
        store.create(bob, draft("b-pub", SessionStatus::Published)).await.unwrap();

        let published = store.list_published().await.unwrap();
        assert_eq!(published.len(), 2);
        assert!(published.iter().all(|s| s.status == SessionStatus::Published));

        let mine = store.list_for_user(alice).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|s| s.user_id == alice));
    }
}
