use std::sync::Arc;

use async_trait::async_trait;

use common::AppResult;
use domain::{EntityId, Person};

use super::store::Store;
use crate::repository::UserRepository;

/// People kept in an in-memory store
pub struct UserStore {
    store: Arc<dyn Store<Person>>,
}

impl UserStore {
    pub fn new(store: Arc<dyn Store<Person>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn save(&self, person: Person) -> AppResult<Person> {
        self.store.save(person)
    }

    async fn find_by_id(&self, id: EntityId) -> AppResult<Person> {
        self.store.find_by_id(id)
    }

    // In-memory workflows are already serialized by the unit of work
    async fn find_by_id_for_update(&self, id: EntityId) -> AppResult<Person> {
        self.store.find_by_id(id)
    }

    async fn delete_by_id(&self, id: EntityId) -> AppResult<()> {
        self.store.delete_by_id(id)
    }

    async fn find_all(&self) -> AppResult<Vec<Person>> {
        self.store.find_all()
    }
}
