//! Authentication and authorization.
//!
//! Credential checks, stateless token issue/verification and the per-request
//! authentication context live here; route handlers only ever see the
//! [`AuthenticationFacade`] and [`AuthenticationContext`].

mod authenticator;
mod authorization;
mod context;
mod facade;
mod token;

pub use authenticator::{TokenAuthenticator, UserAuthenticator};
pub use authorization::{AuthorizationCheck, AuthorizationError, IsSelf};
pub use context::{AuthenticationContext, AuthenticationType, UserResolver};
pub use facade::AuthenticationFacade;
pub use token::{Claims, JwtSecret, JwtTokenTransformer, TokenError};

use thiserror::Error;

/// Why a caller could not be authenticated.
///
/// Credential failures collapse into one variant so responses never reveal
/// whether an account exists.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("incorrect credentials")]
    IncorrectCredentials,

    #[error("Requires Authorization: Type <token>")]
    MissingHeader,

    #[error("unsupported HTTP Authorization type")]
    UnsupportedScheme,

    #[error("unsupported authentication type '{0}'")]
    UnsupportedType(String),

    #[error("token names no user")]
    MissingUser,
}
