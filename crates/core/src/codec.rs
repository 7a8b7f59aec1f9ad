// Bearer token codec
// Decision: Use HS256 JWTs for simplicity (symmetric key)
// Decision: Expiry is always supplied by the caller; the codec holds only the key
//
// Verification is purely local, so forged or garbled tokens are rejected
// before any storage round-trip.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use uuid::Uuid;

use crate::token::TokenClaims;

/// Reasons a token fails verification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// Signs and verifies bearer tokens with a shared secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `user_id` that expires at `expires_at`.
    ///
    /// Sub-second precision of `expires_at` is dropped.
    pub fn issue(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<String, CodecError> {
        let claims = TokenClaims {
            sub: user_id,
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
            jti: Uuid::now_v7(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CodecError::Malformed(format!("Failed to encode token: {}", e)))
    }

    /// Verify signature, structure, and expiry; return the embedded claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, CodecError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => CodecError::InvalidSignature,
                ErrorKind::ExpiredSignature => CodecError::Expired,
                _ => CodecError::Malformed(e.to_string()),
            },
        )?;

        // jsonwebtoken accepts exp == now; a token is only valid strictly before its expiry
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(CodecError::Expired);
        }

        Ok(data.claims)
    }
}
