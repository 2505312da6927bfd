//! User-facing data shapes and their conversion into store rows.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::password::Password;
use crate::infra::repositories::entities::user;
use crate::services::crud::{MalformedData, ResourceData};

/// Payload for registering a user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl ResourceData<user::ActiveModel> for CreateUser {
    fn to_resource(&self) -> Result<user::ActiveModel, MalformedData> {
        let password =
            Password::new(&self.password).map_err(|e| MalformedData(e.to_string()))?;

        Ok(user::ActiveModel {
            id: NotSet,
            name: Set(self.name.clone()),
            email: Set(self.email.clone()),
            password_hash: Set(password.into_string()),
            created_at: Set(Utc::now()),
        })
    }
}

/// Payload for patching a user. Absent fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

impl ResourceData<user::Patch> for UpdateUser {
    fn to_resource(&self) -> Result<user::Patch, MalformedData> {
        let password_hash = match &self.password {
            Some(plain) => Some(
                Password::new(plain)
                    .map_err(|e| MalformedData(e.to_string()))?
                    .into_string(),
            ),
            None => None,
        };

        Ok(user::Patch {
            name: self.name.clone(),
            email: self.email.clone(),
            password_hash,
        })
    }
}

/// User shape returned to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
        }
    }
}
