//! Stateless token issue and verification.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::context::AuthenticationContext;
use crate::config::{JWT_ISSUER, SECONDS_PER_HOUR};

/// Signing secret for the HMAC token scheme.
#[derive(Clone)]
pub struct JwtSecret(Vec<u8>);

impl JwtSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// A fresh random secret. Tokens signed with it die with the process.
    pub fn random(len: usize) -> Self {
        use argon2::password_hash::rand_core::{OsRng, RngCore};

        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("JwtSecret").field(&"[REDACTED]").finish()
    }
}

/// Token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    /// Kind of principal, see [`super::AuthenticationType`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Id of the authenticated user.
    pub user: Option<i32>,
}

/// Token failures, split by direction so issue failures map to a server
/// fault and verification failures to an authentication fault.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("could not issue token")]
    Generation(#[source] jsonwebtoken::errors::Error),

    #[error("invalid or expired token")]
    Unpacking(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies signed tokens carrying an [`AuthenticationContext`]'s
/// identity. Verification requires the signature, the issuer and an
/// unexpired `exp`.
#[derive(Clone)]
pub struct JwtTokenTransformer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl JwtTokenTransformer {
    pub fn new(secret: &JwtSecret, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds: ttl_hours * SECONDS_PER_HOUR,
        }
    }

    /// Lifetime of issued tokens, in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issues a token for the given context. Needs no store access; the
    /// context's id is enough.
    pub fn generate(&self, context: &AuthenticationContext) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: JWT_ISSUER.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
            kind: context.auth_type().to_string(),
            user: Some(context.user_id()),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Generation)
    }

    /// Verifies signature, issuer and expiry, returning the claims.
    pub fn unpack(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[JWT_ISSUER]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Unpacking)
    }
}
