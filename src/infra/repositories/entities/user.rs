//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::infra::repositories::StoreEntity;
use crate::services::crud::Mergeable;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    #[sea_orm(unique)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl StoreEntity for Entity {
    type Key = i32;
    type Active = ActiveModel;

    const NAME: &'static str = "User";

    fn key_column() -> Column {
        Column::Id
    }

    fn key_of(model: &Model) -> i32 {
        model.id
    }
}

/// Field-wise change set for a user. `None` leaves the current value alone.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl Mergeable for Entity {
    type Patch = Patch;

    fn merge(current: Model, patch: Patch) -> Model {
        Model {
            id: current.id,
            name: patch.name.unwrap_or(current.name),
            email: patch.email.unwrap_or(current.email),
            password_hash: patch.password_hash.unwrap_or(current.password_hash),
            created_at: current.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> Model {
        Model {
            id: 7,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn merge_overwrites_only_named_fields() {
        let current = sample();
        let created_at = current.created_at;

        let merged = Entity::merge(
            current,
            Patch {
                name: Some("Grace".to_string()),
                ..Patch::default()
            },
        );

        assert_eq!(merged.id, 7);
        assert_eq!(merged.name, "Grace");
        assert_eq!(merged.email, "ada@example.com");
        assert_eq!(merged.password_hash, "hash");
        assert_eq!(merged.created_at, created_at);
    }

    #[test]
    fn empty_patch_is_identity() {
        let current = sample();
        let merged = Entity::merge(current.clone(), Patch::default());
        assert_eq!(merged, current);
    }
}
