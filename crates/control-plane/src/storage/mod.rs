// Storage layer for the control plane
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// - StorageBackend: picks the backend and hands out trait objects
// - TokenReaper: background purge of expired token records

pub mod backend;
pub mod reaper;

pub use backend::{InMemoryStores, StorageBackend};
pub use reaper::TokenReaper;
