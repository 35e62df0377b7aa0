use std::sync::Arc;

use async_trait::async_trait;

use common::AppResult;
use domain::{Book, EntityId};

use super::store::Store;
use crate::repository::BookRepository;

/// Books kept in an in-memory store.
///
/// Owner lookups are served from the store's owner index.
pub struct BookStore {
    store: Arc<dyn Store<Book>>,
}

impl BookStore {
    pub fn new(store: Arc<dyn Store<Book>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookRepository for BookStore {
    async fn save(&self, book: Book) -> AppResult<Book> {
        self.store.save(book)
    }

    async fn find_by_id(&self, id: EntityId) -> AppResult<Book> {
        self.store.find_by_id(id)
    }

    async fn find_by_id_for_update(&self, id: EntityId) -> AppResult<Book> {
        self.store.find_by_id(id)
    }

    async fn delete_by_id(&self, id: EntityId) -> AppResult<()> {
        self.store.delete_by_id(id)
    }

    async fn find_all_by_owner_id(&self, owner_id: EntityId) -> AppResult<Vec<Book>> {
        self.store.find_all_by_owner(owner_id)
    }
}
