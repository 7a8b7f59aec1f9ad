// Storage backend abstraction
// Decision: Enum over the two backends; handlers only ever see the core traits
//
// This module provides a unified StorageBackend enum that can work with
// either PostgreSQL (production) or in-memory (dev mode) storage.

use anyhow::{Context, Result};
use std::sync::Arc;
use wellness_core::{
    CredentialStore, InMemoryCredentialStore, InMemorySessionStore, InMemoryTokenStore,
    SessionStore, TokenStore,
};
use wellness_storage::Database;

/// In-memory stores for dev mode and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryStores {
    pub users: InMemoryCredentialStore,
    pub tokens: InMemoryTokenStore,
    pub sessions: InMemorySessionStore,
}

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory stores (dev mode)
    InMemory(InMemoryStores),
}

impl StorageBackend {
    /// Connect to PostgreSQL and apply pending migrations
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url)
            .await
            .context("Failed to connect to database")?;
        db.migrate().await.context("Failed to run migrations")?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryStores::default())
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Short name for health output and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "memory",
        }
    }

    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        match self {
            Self::Postgres(db) => Arc::new(db.clone()),
            Self::InMemory(stores) => Arc::new(stores.users.clone()),
        }
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        match self {
            Self::Postgres(db) => Arc::new(db.clone()),
            Self::InMemory(stores) => Arc::new(stores.tokens.clone()),
        }
    }

    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        match self {
            Self::Postgres(db) => Arc::new(db.clone()),
            Self::InMemory(stores) => Arc::new(stores.sessions.clone()),
        }
    }
}
