//! Shared integration test setup: an in-memory SQLite store with the
//! users table created from the entity definition.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbBackend, Schema};
use std::sync::Arc;

use restbase::domain::CreateUser;
use restbase::infra::repositories::entities::user;
use restbase::infra::Persistence;
use restbase::services::UserService;

pub async fn setup() -> Arc<Persistence> {
    // One connection so every operation sees the same in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("sqlite connection");

    let schema = Schema::new(DbBackend::Sqlite);
    let stmt = schema.create_table_from_entity(user::Entity);
    db.execute(db.get_database_backend().build(&stmt))
        .await
        .expect("create users table");

    Arc::new(Persistence::new(db))
}

pub fn create_payload(name: &str, email: &str) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "SecurePassword123".to_string(),
    }
}

pub async fn seed_user(service: &UserService, name: &str, email: &str) -> user::Model {
    service
        .create(&create_payload(name, email))
        .await
        .expect("seed user")
}
