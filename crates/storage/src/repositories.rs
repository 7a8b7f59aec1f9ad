// Repository layer for database operations
//
// `Database` wraps a connection pool and implements the core store traits
// directly, so the control plane can inject it wherever an
// `Arc<dyn CredentialStore>` (or token/session store) is expected.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;
use wellness_core::{
    CredentialStore, NewToken, NewUser, SessionDraft, SessionStore, StoreError, StoreResult,
    StoredToken, TokenStore, User, WellnessSession,
};

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Map a sqlx error into the store error taxonomy
fn store_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::conflict(db.message().to_string())
        }
        _ => StoreError::unavailable(err),
    }
}

// ============================================
// Users
// ============================================

#[async_trait]
impl CredentialStore for Database {
    async fn create_user(&self, input: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }
}

// ============================================
// Auth tokens
// ============================================

#[async_trait]
impl TokenStore for Database {
    async fn insert(&self, input: NewToken) -> StoreResult<StoredToken> {
        let row = sqlx::query_as::<_, AuthTokenRow>(
            r#"
            INSERT INTO auth_tokens (id, user_id, token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(&input.token_hash)
        .bind(input.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn find_active(
        &self,
        token_hash: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredToken>> {
        let row = sqlx::query_as::<_, AuthTokenRow>(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM auth_tokens
            WHERE token_hash = $1 AND user_id = $2 AND expires_at > $3
            LIMIT 1
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn revoke(&self, token_hash: &str, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM auth_tokens
            WHERE token_hash = $1 AND user_id = $2
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(result.rows_affected())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(result.rows_affected())
    }
}

// ============================================
// Wellness sessions
// ============================================

#[async_trait]
impl SessionStore for Database {
    async fn create(&self, user_id: Uuid, draft: SessionDraft) -> StoreResult<WellnessSession> {
        let row = sqlx::query_as::<_, WellnessSessionRow>(
            r#"
            INSERT INTO wellness_sessions (id, user_id, title, description, duration, tags, content, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, title, description, duration, tags, content, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.duration)
        .bind(&draft.tags)
        .bind(&draft.content)
        .bind(draft.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        draft: SessionDraft,
    ) -> StoreResult<Option<WellnessSession>> {
        let row = sqlx::query_as::<_, WellnessSessionRow>(
            r#"
            UPDATE wellness_sessions
            SET title = $3,
                description = $4,
                duration = $5,
                tags = $6,
                content = $7,
                status = $8,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, duration, tags, content, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.duration)
        .bind(&draft.tags)
        .bind(&draft.content)
        .bind(draft.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<WellnessSession>> {
        let row = sqlx::query_as::<_, WellnessSessionRow>(
            r#"
            SELECT id, user_id, title, description, duration, tags, content, status, created_at, updated_at
            FROM wellness_sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_published(&self) -> StoreResult<Vec<WellnessSession>> {
        let rows = sqlx::query_as::<_, WellnessSessionRow>(
            r#"
            SELECT id, user_id, title, description, duration, tags, content, status, created_at, updated_at
            FROM wellness_sessions
            WHERE status = 'published'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<WellnessSession>> {
        let rows = sqlx::query_as::<_, WellnessSessionRow>(
            r#"
            SELECT id, user_id, title, description, duration, tags, content, status, created_at, updated_at
            FROM wellness_sessions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM wellness_sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(result.rows_affected() > 0)
    }
}
