// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config, with JWT_SECRET accepted as a fallback
// Decision: A missing signing secret is a startup error, never a generated default

use anyhow::{bail, Context, Result};
use std::time::Duration;
use wellness_core::{AuthSettings, DEFAULT_MIN_PASSWORD_LENGTH, DEFAULT_TOKEN_LIFETIME};

/// Default interval between expired-token sweeps
pub const DEFAULT_TOKEN_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Complete authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Secret key for signing tokens
    pub jwt_secret: String,
    /// Token lifetime
    pub token_lifetime: Duration,
    /// Minimum password length accepted at registration
    pub min_password_length: usize,
    /// How often expired token records are purged
    pub token_purge_interval: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .field("min_password_length", &self.min_password_length)
            .field("token_purge_interval", &self.token_purge_interval)
            .finish()
    }
}

impl AuthConfig {
    /// Config with defaults for everything but the secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            token_purge_interval: DEFAULT_TOKEN_PURGE_INTERVAL,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("AUTH_JWT_SECRET")
            .or_else(|| lookup("JWT_SECRET"))
            .filter(|s| !s.is_empty())
            .context("AUTH_JWT_SECRET (or JWT_SECRET) environment variable required")?;

        let token_lifetime = parse_secs(&lookup, "AUTH_TOKEN_LIFETIME")?
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);

        let min_password_length = match lookup("AUTH_MIN_PASSWORD_LENGTH") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid AUTH_MIN_PASSWORD_LENGTH: {raw}"))?,
            None => DEFAULT_MIN_PASSWORD_LENGTH,
        };

        let token_purge_interval = parse_secs(&lookup, "AUTH_TOKEN_PURGE_INTERVAL")?
            .unwrap_or(DEFAULT_TOKEN_PURGE_INTERVAL);

        if token_lifetime.is_zero() {
            bail!("AUTH_TOKEN_LIFETIME must be greater than zero");
        }
        if token_purge_interval.is_zero() {
            bail!("AUTH_TOKEN_PURGE_INTERVAL must be greater than zero");
        }

        Ok(Self {
            jwt_secret,
            token_lifetime,
            min_password_length,
            token_purge_interval,
        })
    }

    /// Settings consumed by the auth service
    pub fn settings(&self) -> AuthSettings {
        AuthSettings {
            secret: self.jwt_secret.clone(),
            token_lifetime: self.token_lifetime,
            min_password_length: self.min_password_length,
        }
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| format!("Invalid {key}: {raw}"))
        })
        .transpose()
}
