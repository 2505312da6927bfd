//! Resource updates.

use sea_orm::IntoActiveModel;
use std::collections::HashMap;
use std::sync::Arc;

use super::data::{ResourceData, ResourceValidator};
use super::Mergeable;
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{CrudRepository, ReadRepository};
use crate::infra::Persistence;

/// Updates resources of one entity type by folding a patch over the current
/// row. Lookup, merge, validation and write share one transaction, so a
/// concurrent delete cannot slip between the read and the write.
pub struct ResourceUpdater<E>
where
    E: Mergeable,
    E::Model: IntoActiveModel<E::Active> + Send + Sync + 'static,
{
    store: Arc<Persistence>,
    validator: Option<Arc<dyn ResourceValidator<E::Model>>>,
}

impl<E> ResourceUpdater<E>
where
    E: Mergeable,
    E::Model: IntoActiveModel<E::Active> + Send + Sync + 'static,
{
    pub fn new(store: Arc<Persistence>) -> Self {
        Self {
            store,
            validator: None,
        }
    }

    pub fn with_validator(
        store: Arc<Persistence>,
        validator: Arc<dyn ResourceValidator<E::Model>>,
    ) -> Self {
        Self {
            store,
            validator: Some(validator),
        }
    }

    /// Applies one patch. A missing key is a not-found failure; a validation
    /// failure of the merged row rolls the transaction back.
    pub async fn update<D: ResourceData<E::Patch>>(
        &self,
        id: E::Key,
        data: &D,
    ) -> AppResult<E::Model> {
        let patch = data.to_resource()?;
        let validator = self.validator.clone();

        self.store
            .transaction(move |ctx| {
                Box::pin(async move {
                    let repo = ctx.repository::<E>();

                    let current = repo
                        .get(id.clone())
                        .await?
                        .ok_or_else(|| AppError::not_found(E::NAME, &id))?;

                    let merged = E::merge(current, patch);
                    if let Some(validator) = &validator {
                        validator.validate(&merged)?;
                    }

                    repo.update(merged).await
                })
            })
            .await
    }

    /// Applies a batch of patches atomically: one missing key or invalid
    /// merged row rolls back every change in the batch.
    pub async fn update_all<D: ResourceData<E::Patch>>(
        &self,
        patches: HashMap<E::Key, D>,
    ) -> AppResult<HashMap<E::Key, E::Model>> {
        let mut converted = Vec::with_capacity(patches.len());
        for (id, data) in &patches {
            converted.push((id.clone(), data.to_resource()?));
        }
        let validator = self.validator.clone();

        self.store
            .transaction(move |ctx| {
                Box::pin(async move {
                    let repo = ctx.repository::<E>();
                    let mut updated = HashMap::with_capacity(converted.len());

                    for (id, patch) in converted {
                        let current = repo
                            .get(id.clone())
                            .await?
                            .ok_or_else(|| AppError::not_found(E::NAME, &id))?;

                        let merged = E::merge(current, patch);
                        if let Some(validator) = &validator {
                            validator.validate(&merged)?;
                        }

                        updated.insert(id, repo.update(merged).await?);
                    }

                    Ok(updated)
                })
            })
            .await
    }
}
