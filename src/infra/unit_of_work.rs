//! Transaction brackets and repository access.
//!
//! [`Persistence`] wraps the connection pool and hands out repositories,
//! either directly on the pool or scoped to an open transaction through
//! [`TransactionContext`]. The closure passed to [`Persistence::transaction`]
//! must move owned values in; it cannot capture borrows of the caller's
//! locals.

use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use super::repositories::{SeaRepository, StoreEntity};
use crate::errors::{AppError, AppResult};

/// Entry point to the store. Cheap to clone through `Arc` at the service
/// layer; owns the connection pool.
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Repository over `E` running directly on the pool, outside any
    /// transaction bracket.
    pub fn repository<E>(&self) -> SeaRepository<'_, DatabaseConnection, E>
    where
        E: StoreEntity,
        E::Model: sea_orm::IntoActiveModel<E::Active> + Send + Sync + 'static,
    {
        SeaRepository::new(&self.db)
    }

    /// Runs the closure inside a transaction: committed when it returns
    /// `Ok`, rolled back when it returns `Err`.
    ///
    /// ReadCommitted isolation; the store may still reject concurrent
    /// writes, which surfaces as a database error.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Repository access scoped to one open transaction.
///
/// Every repository handed out here runs on the same transaction; nothing
/// is visible outside it until the bracket commits.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Repository over `E` bound to this transaction.
    pub fn repository<E>(&self) -> SeaRepository<'a, DatabaseTransaction, E>
    where
        E: StoreEntity,
        E::Model: sea_orm::IntoActiveModel<E::Active> + Send + Sync + 'static,
    {
        SeaRepository::new(self.txn)
    }
}
