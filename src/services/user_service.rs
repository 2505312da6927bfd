//! User resource service.
//!
//! Thin composition of the generic orchestration pieces over the user
//! entity, plus the user-specific rules (email uniqueness) that the generic
//! layer cannot know about.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::crud::{
    DeriveValidator, ResourceCreator, ResourceDeleter, ResourceRetriever, ResourceUpdater,
};
use crate::domain::{CreateUser, UpdateUser};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::user;
use crate::infra::repositories::{Operation, ReadRepository};
use crate::infra::Persistence;

pub struct UserService {
    store: Arc<Persistence>,
    creator: ResourceCreator<user::Entity>,
    retriever: ResourceRetriever<user::Entity>,
    updater: ResourceUpdater<user::Entity>,
    deleter: ResourceDeleter<user::Entity>,
}

impl UserService {
    pub fn new(store: Arc<Persistence>) -> Self {
        Self {
            creator: ResourceCreator::new(store.clone()),
            retriever: ResourceRetriever::new(store.clone()),
            updater: ResourceUpdater::with_validator(store.clone(), Arc::new(DeriveValidator)),
            deleter: ResourceDeleter::new(store.clone()),
            store,
        }
    }

    /// Registers a user. A taken email is a conflict; the unique column
    /// backs the pre-check up against races.
    pub async fn create(&self, data: &CreateUser) -> AppResult<user::Model> {
        if self.get_by_email(&data.email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        self.creator.create(data).await
    }

    pub async fn get(&self, id: i32) -> AppResult<user::Model> {
        self.retriever.get(id).await
    }

    pub async fn get_many(&self, ids: &HashSet<i32>) -> AppResult<HashMap<i32, user::Model>> {
        self.retriever.get_many(ids).await
    }

    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        self.store
            .repository::<user::Entity>()
            .query()
            .filter(Operation::eq("email", email))
            .one()
            .await
    }

    pub async fn list(&self) -> AppResult<Vec<user::Model>> {
        self.retriever.get_all().await
    }

    pub async fn list_page(&self, page_size: i64, page_number: i64) -> AppResult<Vec<user::Model>> {
        self.retriever.get_paginated(page_size, page_number).await
    }

    pub async fn count(&self) -> AppResult<u64> {
        self.retriever.count().await
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        self.retriever.exists(id).await
    }

    pub async fn exists_all(&self, ids: &HashSet<i32>) -> AppResult<bool> {
        self.retriever.exists_all(ids).await
    }

    /// Patches a user; the merged row is revalidated before the write.
    /// Moving to an email another user holds is a conflict.
    pub async fn update(&self, id: i32, data: &UpdateUser) -> AppResult<user::Model> {
        if let Some(email) = &data.email {
            self.ensure_email_available(id, email).await?;
        }

        self.updater.update(id, data).await
    }

    /// Patches a batch atomically; one bad or missing entry rolls back all.
    pub async fn update_many(
        &self,
        patches: HashMap<i32, UpdateUser>,
    ) -> AppResult<HashMap<i32, user::Model>> {
        for (id, data) in &patches {
            if let Some(email) = &data.email {
                self.ensure_email_available(*id, email).await?;
            }
        }

        self.updater.update_all(patches).await
    }

    /// A user may keep their own email; anyone else holding it is a
    /// conflict. The unique column backs this up against races.
    async fn ensure_email_available(&self, id: i32, email: &str) -> AppResult<()> {
        match self.get_by_email(email).await? {
            Some(existing) if existing.id != id => Err(AppError::conflict("User")),
            _ => Ok(()),
        }
    }

    pub async fn delete(&self, id: i32) -> AppResult<user::Model> {
        self.deleter.delete(id).await
    }

    pub async fn delete_many(&self, ids: Vec<i32>) -> AppResult<HashMap<i32, user::Model>> {
        self.deleter.delete_many(ids).await
    }
}
