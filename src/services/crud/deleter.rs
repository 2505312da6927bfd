//! Resource deletion.

use sea_orm::IntoActiveModel;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{CrudRepository, StoreEntity};
use crate::infra::Persistence;

/// Deletes resources of one entity type. Point deletion promotes absence to
/// a not-found failure; batch deletion skips missing keys instead.
pub struct ResourceDeleter<E>
where
    E: StoreEntity,
    E::Model: IntoActiveModel<E::Active> + Send + Sync + 'static,
{
    store: Arc<Persistence>,
    _entity: std::marker::PhantomData<E>,
}

impl<E> ResourceDeleter<E>
where
    E: StoreEntity,
    E::Model: IntoActiveModel<E::Active> + Send + Sync + 'static,
{
    pub fn new(store: Arc<Persistence>) -> Self {
        Self {
            store,
            _entity: std::marker::PhantomData,
        }
    }

    /// Deletes one resource and returns the removed row; a missing key is a
    /// not-found failure.
    pub async fn delete(&self, id: E::Key) -> AppResult<E::Model> {
        self.store
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.repository::<E>()
                        .delete_by_id(id.clone())
                        .await?
                        .ok_or_else(|| AppError::not_found(E::NAME, &id))
                })
            })
            .await
    }

    /// Deletes the given row by its key.
    pub async fn delete_entity(&self, model: E::Model) -> AppResult<E::Model> {
        self.delete(E::key_of(&model)).await
    }

    /// Deletes a batch in one transaction. Missing keys are skipped, never
    /// an error; the result holds only the rows actually removed.
    pub async fn delete_many(&self, ids: Vec<E::Key>) -> AppResult<HashMap<E::Key, E::Model>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        self.store
            .transaction(move |ctx| {
                Box::pin(async move {
                    let repo = ctx.repository::<E>();
                    let mut removed = HashMap::new();
                    for id in ids {
                        if let Some(model) = repo.delete_by_id(id.clone()).await? {
                            removed.insert(id, model);
                        }
                    }
                    Ok(removed)
                })
            })
            .await
    }

    /// Deletes the given rows in one transaction and echoes them back.
    pub async fn delete_all(&self, models: Vec<E::Model>) -> AppResult<Vec<E::Model>> {
        if models.is_empty() {
            return Ok(models);
        }

        self.store
            .transaction(move |ctx| {
                Box::pin(async move { ctx.repository::<E>().delete_all(models).await })
            })
            .await
    }
}
