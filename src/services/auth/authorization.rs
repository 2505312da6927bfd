//! Authorization checks applied after authentication.

use async_trait::async_trait;
use thiserror::Error;

use super::context::AuthenticationContext;

/// Why an authenticated caller may not perform an action.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct AuthorizationError(pub String);

/// One permission rule evaluated against the caller's context.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorizationCheck: Send + Sync {
    async fn check(&self, context: &AuthenticationContext) -> Result<(), AuthorizationError>;
}

/// Permits an action only on the caller's own user resource.
pub struct IsSelf {
    pub user_id: i32,
}

#[async_trait]
impl AuthorizationCheck for IsSelf {
    async fn check(&self, context: &AuthenticationContext) -> Result<(), AuthorizationError> {
        if context.user_id() == self.user_id {
            Ok(())
        } else {
            Err(AuthorizationError(
                "you may only act on your own user".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::entities::user;

    fn context(id: i32) -> AuthenticationContext {
        AuthenticationContext::eager(user::Model {
            id,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: chrono::Utc::now(),
        })
    }

    #[tokio::test]
    async fn is_self_permits_own_resource() {
        let check = IsSelf { user_id: 3 };
        assert!(check.check(&context(3)).await.is_ok());
    }

    #[tokio::test]
    async fn is_self_rejects_other_resource() {
        let check = IsSelf { user_id: 3 };
        assert!(check.check(&context(4)).await.is_err());
    }

    #[tokio::test]
    async fn checks_can_be_mocked() {
        let mut mock = MockAuthorizationCheck::new();
        mock.expect_check()
            .times(1)
            .returning(|_| Err(AuthorizationError("denied".to_string())));

        let result = mock.check(&context(1)).await;
        assert_eq!(result.unwrap_err().0, "denied");
    }
}
