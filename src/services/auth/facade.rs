//! Single entry point the API layer uses for authentication.

use std::sync::Arc;

use super::authenticator::{TokenAuthenticator, UserAuthenticator};
use super::context::AuthenticationContext;
use super::token::{JwtSecret, JwtTokenTransformer};
use super::AuthenticationError;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppResult;
use crate::infra::Persistence;

/// Bundles credential authentication, token issue and token authentication
/// behind one surface.
pub struct AuthenticationFacade {
    transformer: JwtTokenTransformer,
    user_auth: UserAuthenticator,
    token_auth: TokenAuthenticator,
}

impl AuthenticationFacade {
    pub fn new(secret: &JwtSecret, ttl_hours: i64, store: Arc<Persistence>) -> Self {
        let transformer = JwtTokenTransformer::new(secret, ttl_hours);
        Self {
            user_auth: UserAuthenticator::new(store.clone()),
            token_auth: TokenAuthenticator::new(transformer.clone(), store),
            transformer,
        }
    }

    /// Email/password login.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthenticationContext> {
        self.user_auth.authenticate(email, password).await
    }

    /// Issues a token for an authenticated context.
    pub fn generate_token(&self, context: &AuthenticationContext) -> AppResult<String> {
        Ok(self.transformer.generate(context)?)
    }

    /// Lifetime of issued tokens, in seconds.
    pub fn token_ttl_seconds(&self) -> i64 {
        self.transformer.ttl_seconds()
    }

    /// Authenticates a bare token string.
    pub async fn authenticate_token(&self, token: &str) -> AppResult<AuthenticationContext> {
        self.token_auth.authenticate(token).await
    }

    /// Authenticates the raw `Authorization` header value. A missing header
    /// and a non-Bearer scheme are reported distinctly so clients learn the
    /// expected shape without learning anything about accounts.
    pub async fn authenticate_bearer_header(
        &self,
        header: Option<&str>,
    ) -> AppResult<AuthenticationContext> {
        let header = header.ok_or(AuthenticationError::MissingHeader)?.trim();

        let token = header
            .strip_prefix(BEARER_TOKEN_PREFIX)
            .ok_or(AuthenticationError::UnsupportedScheme)?;

        self.authenticate_token(token.trim()).await
    }
}
