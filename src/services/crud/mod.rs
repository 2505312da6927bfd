//! Generic resource orchestration on top of the repositories.
//!
//! The creator, retriever, updater and deleter each wrap one slice of a
//! resource's lifecycle: validation, transaction brackets and not-found
//! promotion live here so concrete services stay thin.

mod creator;
mod data;
mod deleter;
mod retriever;
mod updater;

pub use creator::ResourceCreator;
pub use data::{DeriveValidator, MalformedData, ResourceData, ResourceValidator};
pub use deleter::ResourceDeleter;
pub use retriever::ResourceRetriever;
pub use updater::ResourceUpdater;

use crate::infra::repositories::StoreEntity;
use sea_orm::IntoActiveModel;

/// Entities whose rows accept a field-wise patch.
///
/// `merge` folds a patch over the current row, leaving identity and any
/// untouched fields intact. Each entity names its own patch type; there is
/// no reflective merging.
pub trait Mergeable: StoreEntity
where
    Self::Model: IntoActiveModel<Self::Active> + Send + Sync + 'static,
{
    type Patch: Send + 'static;

    fn merge(current: Self::Model, patch: Self::Patch) -> Self::Model;
}
