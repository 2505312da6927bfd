//! Resource creation.

use sea_orm::IntoActiveModel;
use std::sync::Arc;

use super::data::{ResourceData, ResourceValidator};
use crate::errors::AppResult;
use crate::infra::repositories::{CrudRepository, StoreEntity};
use crate::infra::Persistence;

/// Creates resources of one entity type: converts inbound data, validates
/// the draft, then persists inside a transaction. Keys are assigned by the
/// store, never taken from the input.
pub struct ResourceCreator<E>
where
    E: StoreEntity,
    E::Model: IntoActiveModel<E::Active> + Send + Sync + 'static,
{
    store: Arc<Persistence>,
    validator: Option<Arc<dyn ResourceValidator<E::Active>>>,
}

impl<E> ResourceCreator<E>
where
    E: StoreEntity,
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
        validator: Arc<dyn ResourceValidator<E::Active>>,
    ) -> Self {
        Self {
            store,
            validator: Some(validator),
        }
    }

    /// Creates one resource and returns the stored row with its assigned key.
    pub async fn create<D: ResourceData<E::Active>>(&self, data: &D) -> AppResult<E::Model> {
        let draft = data.to_resource()?;
        if let Some(validator) = &self.validator {
            validator.validate(&draft)?;
        }

        self.store
            .transaction(move |ctx| {
                Box::pin(async move { ctx.repository::<E>().persist(draft).await })
            })
            .await
    }

    /// Creates a batch atomically: every draft is converted and validated
    /// up front, and all inserts share one transaction, so a failure leaves
    /// no partial batch behind. Results come back in input order.
    pub async fn create_all<D: ResourceData<E::Active>>(
        &self,
        data: &[D],
    ) -> AppResult<Vec<E::Model>> {
        let mut drafts = Vec::with_capacity(data.len());
        for item in data {
            let draft = item.to_resource()?;
            if let Some(validator) = &self.validator {
                validator.validate(&draft)?;
            }
            drafts.push(draft);
        }

        self.store
            .transaction(move |ctx| {
                Box::pin(async move {
                    let repo = ctx.repository::<E>();
                    let mut created = Vec::with_capacity(drafts.len());
                    for draft in drafts {
                        created.push(repo.persist(draft).await?);
                    }
                    Ok(created)
                })
            })
            .await
    }
}
