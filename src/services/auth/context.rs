//! Per-request authentication context.

use futures::future::BoxFuture;
use std::str::FromStr;
use tokio::sync::OnceCell;

use crate::errors::AppResult;
use crate::infra::repositories::entities::user;

/// Kind of principal a token authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationType {
    User,
}

impl std::fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthenticationType::User => write!(f, "user"),
        }
    }
}

impl FromStr for AuthenticationType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(AuthenticationType::User),
            _ => Err(()),
        }
    }
}

/// Deferred lookup of the authenticated user's row.
pub type UserResolver =
    Box<dyn Fn() -> BoxFuture<'static, AppResult<Option<user::Model>>> + Send + Sync>;

/// The authenticated principal of one request.
///
/// An eager context already holds the user row (credential login just read
/// it). A lazy context holds only the id from a verified token and resolves
/// the row on first use, caching the outcome for the rest of the request,
/// including a negative outcome for a user deleted since token issue.
pub enum AuthenticationContext {
    Eager {
        user: user::Model,
    },
    Lazy {
        user_id: i32,
        resolver: UserResolver,
        resolved: OnceCell<Option<user::Model>>,
    },
}

impl std::fmt::Debug for AuthenticationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthenticationContext::Eager { user } => f
                .debug_struct("AuthenticationContext::Eager")
                .field("user_id", &user.id)
                .finish(),
            AuthenticationContext::Lazy { user_id, .. } => f
                .debug_struct("AuthenticationContext::Lazy")
                .field("user_id", user_id)
                .finish(),
        }
    }
}

impl AuthenticationContext {
    pub fn eager(user: user::Model) -> Self {
        AuthenticationContext::Eager { user }
    }

    pub fn lazy(user_id: i32, resolver: UserResolver) -> Self {
        AuthenticationContext::Lazy {
            user_id,
            resolver,
            resolved: OnceCell::new(),
        }
    }

    pub fn auth_type(&self) -> AuthenticationType {
        AuthenticationType::User
    }

    /// Id of the authenticated user, available without any store access.
    pub fn user_id(&self) -> i32 {
        match self {
            AuthenticationContext::Eager { user } => user.id,
            AuthenticationContext::Lazy { user_id, .. } => *user_id,
        }
    }

    /// The authenticated user's row. For a lazy context the first call runs
    /// the resolver; later calls reuse the cached outcome. `None` means the
    /// user no longer exists.
    pub async fn user(&self) -> AppResult<Option<&user::Model>> {
        match self {
            AuthenticationContext::Eager { user } => Ok(Some(user)),
            AuthenticationContext::Lazy {
                resolver, resolved, ..
            } => {
                let cached = resolved.get_or_try_init(|| resolver()).await?;
                Ok(cached.as_ref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sample_user(id: i32) -> user::Model {
        user::Model {
            id,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn counting_resolver(
        result: Option<user::Model>,
        calls: Arc<AtomicUsize>,
    ) -> UserResolver {
        Box::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            let result = result.clone();
            Box::pin(async move { Ok(result) })
        })
    }

    #[test]
    fn authentication_type_tag_roundtrips() {
        assert_eq!(AuthenticationType::User.to_string(), "user");
        assert_eq!("user".parse(), Ok(AuthenticationType::User));
        assert!("service".parse::<AuthenticationType>().is_err());
    }

    #[tokio::test]
    async fn eager_context_never_resolves() {
        let ctx = AuthenticationContext::eager(sample_user(1));

        assert_eq!(ctx.user_id(), 1);
        let user = ctx.user().await.unwrap().unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn lazy_context_resolves_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let ctx =
            AuthenticationContext::lazy(7, counting_resolver(Some(sample_user(7)), calls.clone()));

        assert_eq!(ctx.user_id(), 7);
        for _ in 0..3 {
            assert!(ctx.user().await.unwrap().is_some());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lazy_context_caches_absence() {
        let calls = Arc::new(AtomicUsize::new(0));
        let ctx = AuthenticationContext::lazy(9, counting_resolver(None, calls.clone()));

        assert!(ctx.user().await.unwrap().is_none());
        assert!(ctx.user().await.unwrap().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // The id from the token stays available even when the row is gone
        assert_eq!(ctx.user_id(), 9);
    }
}
