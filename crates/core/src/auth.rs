// Auth service
//
// Orchestrates registration, login, logout, and per-request authentication
// over injected stores. Nothing is cached: every check is a fresh store read.
//
// authenticate() always runs the codec before the token store, so forged or
// expired tokens never cost a storage round-trip.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::codec::{CodecError, TokenCodec};
use crate::error::{AuthError, Result, StoreError};
use crate::password::{PasswordHasher, DUMMY_PASSWORD_HASH};
use crate::token::{bearer_token, hash_token, AuthenticatedIdentity, IssuedToken, NewToken};
use crate::traits::{CredentialStore, TokenStore};
use crate::user::{normalize_email, NewUser, User};

/// Default token time-to-live (24 hours)
pub const DEFAULT_TOKEN_LIFETIME: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);

/// Settings for [`AuthService`]
#[derive(Clone)]
pub struct AuthSettings {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime
    pub token_lifetime: std::time::Duration,
    /// Minimum password length enforced at registration
    pub min_password_length: usize,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .field("min_password_length", &self.min_password_length)
            .finish()
    }
}

/// Credential and token lifecycle
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    tokens: Arc<dyn TokenStore>,
    codec: TokenCodec,
    hasher: PasswordHasher,
    token_lifetime: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        tokens: Arc<dyn TokenStore>,
        settings: AuthSettings,
    ) -> Result<Self> {
        if settings.secret.is_empty() {
            return Err(AuthError::internal("Signing secret must not be empty"));
        }
        let token_lifetime = Duration::from_std(settings.token_lifetime)
            .map_err(|e| AuthError::internal(format!("Invalid token lifetime: {}", e)))?;

        Ok(Self {
            users,
            tokens,
            codec: TokenCodec::new(&settings.secret),
            hasher: PasswordHasher::new(settings.min_password_length),
            token_lifetime,
        })
    }

    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Register a new user. Does not log the user in.
    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AuthError::validation("Email is required"));
        }
        if password.is_empty() {
            return Err(AuthError::validation("Password is required"));
        }
        self.hasher.check_policy(password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            debug!("Registration rejected: email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(password).await?;

        let user = self
            .users
            .create_user(NewUser {
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost a concurrent registration race
                StoreError::Conflict(_) => AuthError::DuplicateEmail,
                other => {
                    error!("User creation failed: {}", other);
                    AuthError::from(other)
                }
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verify credentials and issue a stored bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            // Same Argon2 cost as a wrong password
            self.hasher.verify(password, DUMMY_PASSWORD_HASH).await?;
            debug!("Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash).await? {
            debug!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.issue_token(&user).await?;
        info!(user_id = %user.id, expires_at = %issued.expires_at, "User logged in");
        Ok(issued)
    }

    /// Resolve the identity behind an `Authorization` header value.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<AuthenticatedIdentity> {
        let token = bearer_token(authorization).ok_or(AuthError::MissingToken)?;

        let claims = self.codec.verify(token).map_err(|e| {
            debug!("Token rejected by codec: {}", e);
            match e {
                CodecError::Expired => AuthError::Expired,
                CodecError::InvalidSignature | CodecError::Malformed(_) => AuthError::InvalidToken,
            }
        })?;

        let token_hash = hash_token(token);
        let stored = self
            .tokens
            .find_active(&token_hash, claims.sub, Utc::now())
            .await?
            .ok_or_else(|| {
                debug!(user_id = %claims.sub, "Token has no active record");
                AuthError::Revoked
            })?;

        Ok(AuthenticatedIdentity::new(
            stored.user_id,
            token_hash,
            stored.expires_at,
        ))
    }

    /// Revoke the token behind `identity`.
    pub async fn logout(&self, identity: &AuthenticatedIdentity) -> Result<()> {
        let removed = self
            .tokens
            .revoke(identity.token_hash(), identity.user_id())
            .await?;

        if removed == 0 {
            // Concurrent logout already removed it; the token is dead either way
            warn!(user_id = %identity.user_id(), "Logout found no token record to revoke");
        } else {
            info!(user_id = %identity.user_id(), "User logged out");
        }
        Ok(())
    }

    /// Fresh read of the authenticated user.
    pub async fn profile(&self, identity: &AuthenticatedIdentity) -> Result<User> {
        self.users
            .find_by_id(identity.user_id())
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Remove expired token records. Returns the number removed.
    pub async fn purge_expired_tokens(&self) -> Result<u64> {
        Ok(self.tokens.purge_expired(Utc::now()).await?)
    }

    async fn issue_token(&self, user: &User) -> Result<IssuedToken> {
        let expires_at = Self::whole_seconds(Utc::now() + self.token_lifetime);
        let token = self
            .codec
            .issue(user.id, expires_at)
            .map_err(|e| AuthError::internal(e.to_string()))?;

        self.tokens
            .insert(NewToken {
                user_id: user.id,
                token_hash: hash_token(&token),
                expires_at,
            })
            .await?;

        Ok(IssuedToken {
            token,
            user_id: user.id,
            expires_at,
        })
    }

    // Claims carry whole seconds; keep the stored expiry identical to the embedded one
    fn whole_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
        DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryCredentialStore, InMemoryTokenStore};
    use crate::traits::StoreResult;
    use crate::user::User;
    use async_trait::async_trait;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-for-testing";

    fn settings() -> AuthSettings {
        AuthSettings {
            secret: SECRET.to_string(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            min_password_length: 6,
        }
    }

    fn service() -> (AuthService, InMemoryTokenStore) {
        let tokens = InMemoryTokenStore::new();
        let service = AuthService::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(tokens.clone()),
            settings(),
        )
        .unwrap();
        (service, tokens)
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn test_register_login_authenticate() {
        let (service, _) = service();
        let user = service.register("alice@example.com", "hunter2").await.unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(user.password_hash.starts_with("$argon2id$"));

        let issued = service.login("alice@example.com", "hunter2").await.unwrap();
        assert_eq!(issued.user_id, user.id);

        let expected = Utc::now() + Duration::hours(24);
        assert!((issued.expires_at - expected).num_seconds().abs() <= 2);

        let identity = service
            .authenticate(Some(&bearer(&issued.token)))
            .await
            .unwrap();
        assert_eq!(identity.user_id(), user.id);
        assert_eq!(identity.expires_at(), issued.expires_at);
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let (service, _) = service();
        let user = service.register("  Alice@Example.COM ", "hunter2").await.unwrap();
        assert_eq!(user.email, "alice@example.com");

        // Login is case-insensitive too
        assert!(service.login("ALICE@example.com", "hunter2").await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_email_case_insensitive() {
        let (service, _) = service();
        service.register("bob@x.com", "password1").await.unwrap();

        let err = service.register("BOB@X.COM", "another-password").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));

        let err = service.register("bob@x.com", "password1").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let (service, _) = service();
        assert!(matches!(
            service.register("", "hunter2").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            service.register("   ", "hunter2").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            service.register("a@b.com", "").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            service.register("a@b.com", "short").await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_no_enumeration() {
        let (service, _) = service();
        service.register("carol@x.com", "correct-horse").await.unwrap();

        let wrong_password = service.login("carol@x.com", "battery-staple").await.unwrap_err();
        let no_such_user = service.login("nobody@x.com", "correct-horse").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(no_such_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), no_such_user.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_missing_token() {
        let (service, _) = service();
        for header in [None, Some(""), Some("Bearer "), Some("Basic abc")] {
            let err = service.authenticate(header).await.unwrap_err();
            assert!(matches!(err, AuthError::MissingToken), "header {:?}", header);
        }
    }

    #[tokio::test]
    async fn test_authenticate_expired_signed_token() {
        let (service, tokens) = service();
        let user = service.register("dave@x.com", "hunter2").await.unwrap();

        // Validly signed, already expired, and even present in the store
        let expires_at = AuthService::whole_seconds(Utc::now() - Duration::minutes(1));
        let token = TokenCodec::new(SECRET).issue(user.id, expires_at).unwrap();
        tokens
            .insert(NewToken {
                user_id: user.id,
                token_hash: hash_token(&token),
                expires_at,
            })
            .await
            .unwrap();

        let err = service.authenticate(Some(&bearer(&token))).await.unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[tokio::test]
    async fn test_authenticate_mangled_token() {
        let (service, _) = service();
        service.register("erin@x.com", "hunter2").await.unwrap();
        let issued = service.login("erin@x.com", "hunter2").await.unwrap();

        // Alter one byte in each of the three segments
        let dots: Vec<usize> = issued.token.match_indices('.').map(|(i, _)| i).collect();
        for pos in [dots[0] / 2, (dots[0] + dots[1]) / 2, dots[1] + 5] {
            let mut bytes = issued.token.clone().into_bytes();
            bytes[pos] = if bytes[pos] == b'A' { b'B' } else { b'A' };
            let mangled = String::from_utf8(bytes).unwrap();

            let err = service.authenticate(Some(&bearer(&mangled))).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidToken), "pos {}", pos);
        }
    }

    #[tokio::test]
    async fn test_authenticate_foreign_secret() {
        let (service, _) = service();
        let user = service.register("frank@x.com", "hunter2").await.unwrap();
        let token = TokenCodec::new("some-other-secret")
            .issue(user.id, Utc::now() + Duration::hours(1))
            .unwrap();

        let err = service.authenticate(Some(&bearer(&token))).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_unstored_token_is_revoked() {
        let (service, _) = service();
        let user = service.register("gina@x.com", "hunter2").await.unwrap();

        // Correct secret, never persisted
        let token = TokenCodec::new(SECRET)
            .issue(user.id, Utc::now() + Duration::hours(1))
            .unwrap();

        let err = service.authenticate(Some(&bearer(&token))).await.unwrap_err();
        assert!(matches!(err, AuthError::Revoked));
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let (service, tokens) = service();
        service.register("hank@x.com", "hunter2").await.unwrap();
        let issued = service.login("hank@x.com", "hunter2").await.unwrap();
        let header = bearer(&issued.token);

        let identity = service.authenticate(Some(&header)).await.unwrap();
        service.logout(&identity).await.unwrap();
        assert!(tokens.is_empty());

        let err = service.authenticate(Some(&header)).await.unwrap_err();
        assert!(matches!(err, AuthError::Revoked | AuthError::Expired));

        // A second logout with a stale identity is harmless
        service.logout(&identity).await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_leaves_other_sessions() {
        let (service, tokens) = service();
        service.register("ivy@x.com", "hunter2").await.unwrap();

        // Back-to-back logins usually share iat and exp
        let first = service.login("ivy@x.com", "hunter2").await.unwrap();
        let second = service.login("ivy@x.com", "hunter2").await.unwrap();
        assert_ne!(first.token, second.token);
        assert_ne!(hash_token(&first.token), hash_token(&second.token));
        assert_eq!(tokens.len(), 2);

        let identity = service.authenticate(Some(&bearer(&first.token))).await.unwrap();
        service.logout(&identity).await.unwrap();
        assert_eq!(tokens.len(), 1);

        let err = service
            .authenticate(Some(&bearer(&first.token)))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Revoked));
        let other = service
            .authenticate(Some(&bearer(&second.token)))
            .await
            .unwrap();
        assert_eq!(other.user_id(), identity.user_id());
    }

    #[tokio::test]
    async fn test_profile() {
        let (service, _) = service();
        let user = service.register("jane@x.com", "hunter2").await.unwrap();
        let issued = service.login("jane@x.com", "hunter2").await.unwrap();
        let identity = service.authenticate(Some(&bearer(&issued.token))).await.unwrap();

        let profile = service.profile(&identity).await.unwrap();
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.email, "jane@x.com");
    }

    #[tokio::test]
    async fn test_purge_expired_tokens() {
        let (service, tokens) = service();
        tokens
            .insert(NewToken {
                user_id: Uuid::now_v7(),
                token_hash: hash_token("stale"),
                expires_at: Utc::now() - Duration::seconds(1),
            })
            .await
            .unwrap();

        assert_eq!(service.purge_expired_tokens().await.unwrap(), 1);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = AuthService::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemoryTokenStore::new()),
            AuthSettings {
                secret: String::new(),
                ..settings()
            },
        );
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    /// Credential store whose lookup never sees the competing writer
    struct RacingCredentialStore;

    #[async_trait]
    impl CredentialStore for RacingCredentialStore {
        async fn create_user(&self, _input: NewUser) -> StoreResult<User> {
            Err(StoreError::conflict("users_email_key"))
        }

        async fn find_by_email(&self, _email: &str) -> StoreResult<Option<User>> {
            Ok(None)
        }

        async fn find_by_id(&self, _id: Uuid) -> StoreResult<Option<User>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_lost_registration_race_is_duplicate() {
        let service = AuthService::new(
            Arc::new(RacingCredentialStore),
            Arc::new(InMemoryTokenStore::new()),
            settings(),
        )
        .unwrap();

        let err = service.register("race@x.com", "hunter2").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    /// Store that is always down
    struct DownStore;

    #[async_trait]
    impl CredentialStore for DownStore {
        async fn create_user(&self, _input: NewUser) -> StoreResult<User> {
            Err(StoreError::unavailable(anyhow::anyhow!("connection refused")))
        }

        async fn find_by_email(&self, _email: &str) -> StoreResult<Option<User>> {
            Err(StoreError::unavailable(anyhow::anyhow!("connection refused")))
        }

        async fn find_by_id(&self, _id: Uuid) -> StoreResult<Option<User>> {
            Err(StoreError::unavailable(anyhow::anyhow!("connection refused")))
        }
    }

    #[tokio::test]
    async fn test_store_outage_surfaces() {
        let service = AuthService::new(
            Arc::new(DownStore),
            Arc::new(InMemoryTokenStore::new()),
            settings(),
        )
        .unwrap();

        let err = service.login("a@b.com", "hunter2").await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }
}
