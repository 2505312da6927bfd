//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, Persistence};
use crate::services::auth::AuthenticationFacade;
use crate::services::UserService;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_facade: Arc<AuthenticationFacade>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the full service graph from configuration. Connects to the
    /// database and runs pending migrations.
    pub async fn from_config(config: &Config) -> Self {
        let database = Arc::new(Database::connect(config).await);
        let store = Arc::new(Persistence::new(database.get_connection()));

        Self {
            user_service: Arc::new(UserService::new(store.clone())),
            auth_facade: Arc::new(AuthenticationFacade::new(
                &config.jwt_secret(),
                config.jwt_expiration_hours,
                store,
            )),
            database,
        }
    }
}
