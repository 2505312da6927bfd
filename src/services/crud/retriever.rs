//! Resource retrieval.

use sea_orm::IntoActiveModel;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{ReadRepository, StoreEntity};
use crate::infra::Persistence;

/// Reads resources of one entity type. Point lookups promote absence to a
/// not-found failure; batch and scan operations report absence through
/// their return shapes instead.
pub struct ResourceRetriever<E>
where
    E: StoreEntity,
    E::Model: IntoActiveModel<E::Active> + Send + Sync + 'static,
{
    store: Arc<Persistence>,
    _entity: std::marker::PhantomData<E>,
}

impl<E> ResourceRetriever<E>
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

    /// Fetches one resource; a missing key is a not-found failure.
    pub async fn get(&self, id: E::Key) -> AppResult<E::Model> {
        self.store
            .repository::<E>()
            .get(id.clone())
            .await?
            .ok_or_else(|| AppError::not_found(E::NAME, &id))
    }

    /// Fetches a batch; missing keys are absent from the map.
    pub async fn get_many(&self, ids: &HashSet<E::Key>) -> AppResult<HashMap<E::Key, E::Model>> {
        self.store.repository::<E>().get_many(ids).await
    }

    pub async fn get_all(&self) -> AppResult<Vec<E::Model>> {
        self.store.repository::<E>().get_all().await
    }

    pub async fn get_paginated(&self, page_size: i64, page_number: i64) -> AppResult<Vec<E::Model>> {
        self.store
            .repository::<E>()
            .get_paginated(page_size, page_number)
            .await
    }

    pub async fn count(&self) -> AppResult<u64> {
        self.store.repository::<E>().count().await
    }

    pub async fn exists(&self, id: E::Key) -> AppResult<bool> {
        self.store.repository::<E>().exists(id).await
    }

    pub async fn exists_all(&self, ids: &HashSet<E::Key>) -> AppResult<bool> {
        self.store.repository::<E>().exists_all(ids).await
    }
}
