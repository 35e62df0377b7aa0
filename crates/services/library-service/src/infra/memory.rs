//! Unit of Work over the in-memory stores.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use common::AppResult;
use domain::{Book, Person};

use super::unit_of_work::{Transaction, UnitOfWork};
use crate::repository::{
    BookRepository, BookStore, EntityStore, StagedStore, UserRepository, UserStore,
};

/// In-memory Unit of Work.
///
/// Transactions run one at a time: `begin` waits until the previous
/// transaction has committed or rolled back. Readers going through `users()`
/// and `books()` directly never observe half of a commit, since both stores
/// are write-locked while it is published.
#[derive(Default)]
pub struct MemoryUnitOfWork {
    people: Arc<EntityStore<Person>>,
    books: Arc<EntityStore<Book>>,
    gate: Arc<Mutex<()>>,
}

impl MemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn person_store(&self) -> &Arc<EntityStore<Person>> {
        &self.people
    }

    pub fn book_store(&self) -> &Arc<EntityStore<Book>> {
        &self.books
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(UserStore::new(self.people.clone()))
    }

    fn books(&self) -> Arc<dyn BookRepository> {
        Arc::new(BookStore::new(self.books.clone()))
    }

    async fn begin(&self) -> AppResult<Box<dyn Transaction>> {
        let guard = self.gate.clone().lock_owned().await;
        tracing::debug!("In-memory transaction started");

        Ok(Box::new(MemoryTransaction {
            people: Arc::new(StagedStore::new(self.people.clone())),
            books: Arc::new(StagedStore::new(self.books.clone())),
            _guard: guard,
        }))
    }
}

struct MemoryTransaction {
    people: Arc<StagedStore<Person>>,
    books: Arc<StagedStore<Book>>,
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl Transaction for MemoryTransaction {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(UserStore::new(self.people.clone()))
    }

    fn books(&self) -> Arc<dyn BookRepository> {
        Arc::new(BookStore::new(self.books.clone()))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        // Lock order: people, then books
        let mut people = self.people.base().write()?;
        let mut books = self.books.base().write()?;

        self.people.publish(&mut people)?;
        self.books.publish(&mut books)?;
        tracing::debug!("In-memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let discarded = self.people.pending()? + self.books.pending()?;
        tracing::debug!(discarded, "In-memory transaction rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Store;

    fn person(name: &str) -> Person {
        Person {
            id: None,
            full_name: name.to_string(),
            title: "reader".to_string(),
            age: 30,
            status: "ACTIVE".to_string(),
        }
    }

    #[tokio::test]
    async fn test_commit_publishes_staged_writes() {
        let uow = MemoryUnitOfWork::new();

        let tx = uow.begin().await.unwrap();
        let saved = tx.users().save(person("Ann")).await.unwrap();
        assert!(uow.person_store().is_empty().unwrap());

        tx.commit().await.unwrap();
        let found = uow.users().find_by_id(saved.id.unwrap()).await.unwrap();
        assert_eq!(found.full_name, "Ann");
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_writes() {
        let uow = MemoryUnitOfWork::new();
        let kept = uow.person_store().save(person("Kept")).unwrap();

        let tx = uow.begin().await.unwrap();
        tx.users().save(person("Ann")).await.unwrap();
        tx.users().delete_by_id(kept.id.unwrap()).await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(uow.person_store().find_all().unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_ids_consumed_by_rollback_are_not_reused() {
        let uow = MemoryUnitOfWork::new();

        let tx = uow.begin().await.unwrap();
        let discarded = tx.users().save(person("Ann")).await.unwrap().id.unwrap();
        tx.rollback().await.unwrap();

        let tx = uow.begin().await.unwrap();
        let next = tx.users().save(person("Bob")).await.unwrap().id.unwrap();
        tx.commit().await.unwrap();
        assert!(next > discarded);
    }

    #[tokio::test]
    async fn test_transactions_are_serialized() {
        let uow = Arc::new(MemoryUnitOfWork::new());
        let first = uow.begin().await.unwrap();

        let waiting = {
            let uow = uow.clone();
            tokio::spawn(async move {
                let tx = uow.begin().await.unwrap();
                let count = tx.users().find_all().await.unwrap().len();
                tx.rollback().await.unwrap();
                count
            })
        };

        tokio::task::yield_now().await;
        assert!(!waiting.is_finished());

        first.users().save(person("Ann")).await.unwrap();
        first.commit().await.unwrap();

        assert_eq!(waiting.await.unwrap(), 1);
    }
}
