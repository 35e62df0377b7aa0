//! Unit of Work pattern implementation.
//!
//! SOLID (SRP): Manages transaction lifecycle and repository access.
//! DDD: Coordinates operations across users and books atomically.
//!
//! The Unit of Work:
//! - Centralizes access to all repositories
//! - Opens transactions whose repositories share one atomic boundary
//! - Commits on success and rolls back on error (`in_transaction`)

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use crate::repository::{BookRepository, SeaBookRepository, SeaUserRepository, UserRepository};
use common::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// The repositories returned directly act outside any transaction; those
/// obtained from `begin()` act inside the returned transaction.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get book repository
    fn books(&self) -> Arc<dyn BookRepository>;

    /// Open a transaction with serializable isolation.
    async fn begin(&self) -> AppResult<Box<dyn Transaction>>;
}

/// An open transaction.
///
/// Writes made through its repositories become visible to others only on
/// `commit`; `rollback` (or dropping it) discards them. Repositories handed
/// out must be dropped before the transaction is finished.
#[async_trait]
pub trait Transaction: Send {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn books(&self) -> Arc<dyn BookRepository>;

    async fn commit(self: Box<Self>) -> AppResult<()>;

    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Repository access within one transaction.
pub struct TransactionContext {
    pub users: Arc<dyn UserRepository>,
    pub books: Arc<dyn BookRepository>,
}

/// Run `work` inside a transaction.
///
/// The transaction is committed when `work` succeeds and rolled back when it
/// fails; the error from `work` is returned unchanged.
pub async fn in_transaction<U, F, Fut, T>(uow: &U, work: F) -> AppResult<T>
where
    U: UnitOfWork + ?Sized,
    F: FnOnce(TransactionContext) -> Fut + Send,
    Fut: Future<Output = AppResult<T>> + Send,
    T: Send,
{
    let tx = uow.begin().await?;
    let ctx = TransactionContext {
        users: tx.users(),
        books: tx.books(),
    };

    match work(ctx).await {
        Ok(result) => {
            tx.commit().await?;
            Ok(result)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rolling back transaction");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

// =============================================================================
// Relational backend
// =============================================================================

/// Unit of Work over a sea-orm connection
pub struct Persistence {
    db: Arc<DatabaseConnection>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(SeaUserRepository::new(self.db.clone()))
    }

    fn books(&self) -> Arc<dyn BookRepository> {
        Arc::new(SeaBookRepository::new(self.db.clone()))
    }

    async fn begin(&self) -> AppResult<Box<dyn Transaction>> {
        // Read-then-write sequences in updates need serializable isolation
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        Ok(Box::new(DatabaseScope {
            txn: Arc::new(txn),
        }))
    }
}

/// Database transaction shared by the repositories handed out for it
struct DatabaseScope {
    txn: Arc<DatabaseTransaction>,
}

impl DatabaseScope {
    fn into_inner(self) -> AppResult<DatabaseTransaction> {
        Arc::try_unwrap(self.txn)
            .map_err(|_| AppError::internal("transaction still referenced by a repository"))
    }
}

#[async_trait]
impl Transaction for DatabaseScope {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(SeaUserRepository::new(self.txn.clone()))
    }

    fn books(&self) -> Arc<dyn BookRepository> {
        Arc::new(SeaBookRepository::new(self.txn.clone()))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.into_inner()?.commit().await.map_err(AppError::from)
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.into_inner()?.rollback().await.map_err(AppError::from)
    }
}
