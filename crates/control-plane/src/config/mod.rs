// Server configuration loaded from environment variables
//
// Auth settings live in auth::config; this covers the listener, routing
// and error-rendering knobs.

use anyhow::{Context, Result};
use axum::http::HeaderValue;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 4000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub port: u16,
    /// Optional prefix nested in front of all API routes (e.g. "/v2")
    pub api_prefix: String,
    /// Origins allowed by CORS; empty means no CORS layer
    pub cors_origins: Vec<HeaderValue>,
    /// PostgreSQL URL; None selects in-memory dev mode
    pub database_url: Option<String>,
    /// APP_ENV=development exposes error detail in 5xx bodies
    pub development: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_prefix: String::new(),
            cors_origins: Vec::new(),
            database_url: None,
            development: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT").filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT: {raw}"))?,
            None => DEFAULT_PORT,
        };

        // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
        let cors_origins = lookup("CORS_ALLOWED_ORIGINS")
            .filter(|s| !s.is_empty())
            .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
            .unwrap_or_default();

        Ok(Self {
            port,
            api_prefix: lookup("API_PREFIX").unwrap_or_default(),
            cors_origins,
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            development: lookup("APP_ENV")
                .or_else(|| lookup("NODE_ENV"))
                .map(|s| s.eq_ignore_ascii_case("development"))
                .unwrap_or(false),
        })
    }
}
