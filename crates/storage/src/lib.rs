// Postgres storage layer with sqlx
//
// This crate provides database implementations for core traits:
// - Database: implements CredentialStore, TokenStore and SessionStore

pub mod models;
pub mod repositories;

pub use models::*;
pub use repositories::*;
