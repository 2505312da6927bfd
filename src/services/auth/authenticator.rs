//! Credential and token authenticators.

use futures::FutureExt;
use std::str::FromStr;
use std::sync::Arc;

use super::context::{AuthenticationContext, AuthenticationType};
use super::token::JwtTokenTransformer;
use super::AuthenticationError;
use crate::domain::Password;
use crate::errors::AppResult;
use crate::infra::repositories::entities::user;
use crate::infra::repositories::{Operation, ReadRepository};
use crate::infra::Persistence;

/// Authenticates callers by email and password.
///
/// All credential failures surface as the same error; the internal reason
/// is only traced at debug level. A missing account still pays for one hash
/// verification so response timing does not reveal which emails exist.
pub struct UserAuthenticator {
    store: Arc<Persistence>,
}

impl UserAuthenticator {
    pub fn new(store: Arc<Persistence>) -> Self {
        Self { store }
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthenticationContext> {
        let found = self
            .store
            .repository::<user::Entity>()
            .query()
            .filter(Operation::eq("email", email))
            .one()
            .await?;

        match found {
            Some(user) if Password::from_hash(user.password_hash.clone()).verify(password) => {
                Ok(AuthenticationContext::eager(user))
            }
            Some(_) => {
                tracing::debug!("credential check failed: wrong password");
                Err(AuthenticationError::IncorrectCredentials.into())
            }
            None => {
                Password::dummy().verify(password);
                tracing::debug!("credential check failed: unknown email");
                Err(AuthenticationError::IncorrectCredentials.into())
            }
        }
    }
}

/// Authenticates callers by a previously issued token.
///
/// Verification is stateless; the resulting context is lazy and only
/// touches the store if the request actually needs the user row.
pub struct TokenAuthenticator {
    transformer: JwtTokenTransformer,
    store: Arc<Persistence>,
}

impl TokenAuthenticator {
    pub fn new(transformer: JwtTokenTransformer, store: Arc<Persistence>) -> Self {
        Self { transformer, store }
    }

    pub async fn authenticate(&self, token: &str) -> AppResult<AuthenticationContext> {
        let claims = self.transformer.unpack(token)?;

        AuthenticationType::from_str(&claims.kind)
            .map_err(|_| AuthenticationError::UnsupportedType(claims.kind.clone()))?;

        let user_id = claims.user.ok_or(AuthenticationError::MissingUser)?;

        let store = self.store.clone();
        let resolver = Box::new(move || {
            let store = store.clone();
            async move { store.repository::<user::Entity>().get(user_id).await }.boxed()
        });

        Ok(AuthenticationContext::lazy(user_id, resolver))
    }
}
