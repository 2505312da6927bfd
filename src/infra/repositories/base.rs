//! Generic repository contracts over a sea-orm backed store.
//!
//! `ReadRepository` and `CrudRepository` carry default implementations for
//! every operation, so a concrete repository only has to say which connection
//! it runs on. [`SeaRepository`] is that concrete type; it works equally over
//! a plain connection or an open transaction.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QuerySelect, Value,
};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use super::query::RepositoryQuery;
use crate::errors::AppResult;

/// Glue between a sea-orm entity definition and the generic repositories.
///
/// Ties the entity's primary key column to the key type used for lookups,
/// batch operations and existence checks, and names the active model used
/// for writes. The key is assigned by the store on insert and never changes.
pub trait StoreEntity:
    EntityTrait<Model: IntoActiveModel<Self::Active> + Send + Sync + 'static> + 'static
{
    /// Scalar uniquely identifying one row of this collection.
    type Key: Clone + Eq + Ord + Hash + Debug + Into<Value> + Send + Sync + 'static;

    /// Active model used for inserts and updates.
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send + 'static;

    /// Name used in not-found reports.
    const NAME: &'static str;

    /// Column holding the key.
    fn key_column() -> Self::Column;

    /// Key of a persisted row.
    fn key_of(model: &Self::Model) -> Self::Key;
}

/// Read-only access over one entity collection.
///
/// Missing rows are reported through return values, never as errors; only
/// store failures surface as errors.
#[async_trait]
pub trait ReadRepository<E: StoreEntity>: Send + Sync {
    /// Connection the operations run against. A plain connection and an
    /// open transaction both qualify.
    type Conn: ConnectionTrait;

    fn conn(&self) -> &Self::Conn;

    /// Point lookup. A missing key yields `None`.
    async fn get(&self, id: E::Key) -> AppResult<Option<E::Model>> {
        E::find()
            .filter(E::key_column().eq(id))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Batch lookup. Keys without a matching row are simply absent from the
    /// returned map.
    async fn get_many(&self, ids: &HashSet<E::Key>) -> AppResult<HashMap<E::Key, E::Model>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = E::find()
            .filter(E::key_column().is_in(ids.iter().cloned()))
            .all(self.conn())
            .await?;

        Ok(rows.into_iter().map(|m| (E::key_of(&m), m)).collect())
    }

    /// Full scan, in store-defined order.
    async fn get_all(&self) -> AppResult<Vec<E::Model>> {
        E::find().all(self.conn()).await.map_err(Into::into)
    }

    /// One page of rows. `page_size` is clamped to >= 0 and `page_number`
    /// to >= 1; page n covers offset `(n - 1) * page_size`.
    async fn get_paginated(&self, page_size: i64, page_number: i64) -> AppResult<Vec<E::Model>> {
        let page_size = page_size.max(0) as u64;
        let page_number = page_number.max(1) as u64;

        E::find()
            .offset((page_number - 1) * page_size)
            .limit(page_size)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Number of rows in the collection.
    async fn count(&self) -> AppResult<u64> {
        E::find().count(self.conn()).await.map_err(Into::into)
    }

    /// Whether a row with the given key exists.
    async fn exists(&self, id: E::Key) -> AppResult<bool> {
        let matched = E::find()
            .filter(E::key_column().eq(id))
            .count(self.conn())
            .await?;
        Ok(matched > 0)
    }

    /// Whether every key in the set exists. An empty set is vacuously true.
    async fn exists_all(&self, ids: &HashSet<E::Key>) -> AppResult<bool> {
        if ids.is_empty() {
            return Ok(true);
        }

        let matched = E::find()
            .filter(E::key_column().is_in(ids.iter().cloned()))
            .count(self.conn())
            .await?;
        Ok(matched as usize == ids.len())
    }

    /// Fresh query builder scoped to this collection. Construction performs
    /// no I/O; compilation and execution happen on fetch.
    fn query(&self) -> RepositoryQuery<'_, Self::Conn, E> {
        RepositoryQuery::new(self.conn())
    }
}

/// Read and write access over one entity collection.
///
/// Writes do not commit by themselves; callers own the transaction bracket.
/// No delete variant raises not-found: absence is reported through the
/// return value and promoted to a domain failure by the orchestration layer.
#[async_trait]
pub trait CrudRepository<E: StoreEntity>: ReadRepository<E> {
    /// Inserts the draft, returning the stored row with its assigned key.
    async fn persist(&self, draft: E::Active) -> AppResult<E::Model> {
        draft.insert(self.conn()).await.map_err(Into::into)
    }

    /// Writes every field of the row over its existing identity (full
    /// overwrite; partial-field semantics live in the orchestration merge).
    async fn update(&self, model: E::Model) -> AppResult<E::Model> {
        model
            .into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Looks up then removes the row with the given key, returning the
    /// removed row, or `None` when nothing matched.
    async fn delete_by_id(&self, id: E::Key) -> AppResult<Option<E::Model>> {
        let Some(found) = self.get(id.clone()).await? else {
            return Ok(None);
        };

        E::delete_many()
            .filter(E::key_column().eq(id))
            .exec(self.conn())
            .await?;

        Ok(Some(found))
    }

    /// Deletes the given row by its key.
    async fn delete(&self, model: E::Model) -> AppResult<Option<E::Model>> {
        self.delete_by_id(E::key_of(&model)).await
    }

    /// Deletes each key independently. Every input key appears in the result,
    /// mapped to the removed row or to `None`; a miss does not abort the rest.
    async fn delete_many(&self, ids: &[E::Key]) -> AppResult<HashMap<E::Key, Option<E::Model>>> {
        let mut results = HashMap::with_capacity(ids.len());
        for id in ids {
            let removed = self.delete_by_id(id.clone()).await?;
            results.insert(id.clone(), removed);
        }
        Ok(results)
    }

    /// Deletes each row by its key, in input order, echoing the input
    /// sequence back after the per-item deletions.
    async fn delete_all(&self, models: Vec<E::Model>) -> AppResult<Vec<E::Model>> {
        for model in &models {
            self.delete_by_id(E::key_of(model)).await?;
        }
        Ok(models)
    }
}

/// Repository over one entity collection, backed by a borrowed connection
/// or open transaction. Instances are cheap and request-scoped; they are not
/// shared between concurrent operations.
pub struct SeaRepository<'c, C, E> {
    conn: &'c C,
    _entity: PhantomData<E>,
}

impl<'c, C, E> SeaRepository<'c, C, E> {
    pub fn new(conn: &'c C) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }
}

impl<'c, C, E> ReadRepository<E> for SeaRepository<'c, C, E>
where
    C: ConnectionTrait,
    E: StoreEntity,
{
    type Conn = C;

    fn conn(&self) -> &C {
        self.conn
    }
}

impl<'c, C, E> CrudRepository<E> for SeaRepository<'c, C, E>
where
    C: ConnectionTrait,
    E: StoreEntity,
{
}
