//! User repository contract and its relational implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, EntityTrait, QueryOrder, QuerySelect, Set,
};

use super::entities::person::{self, ActiveModel, Entity as PersonEntity};
use super::sequence::advance_id_sequence;
use common::{AppError, AppResult, OptionExt};
use domain::{Entity, EntityId, Person};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistence provider for people.
///
/// Lookups and deletes of an absent identity fail with `NotFound`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert when the person has no identity, otherwise replace the stored entry
    async fn save(&self, person: Person) -> AppResult<Person>;

    /// Find person by ID
    async fn find_by_id(&self, id: EntityId) -> AppResult<Person>;

    /// Find person by ID and lock it for the rest of the current transaction
    async fn find_by_id_for_update(&self, id: EntityId) -> AppResult<Person>;

    /// Delete person by ID
    async fn delete_by_id(&self, id: EntityId) -> AppResult<()>;

    /// List all people
    async fn find_all(&self) -> AppResult<Vec<Person>>;
}

/// SeaORM implementation, usable over a plain connection or a transaction
pub struct SeaUserRepository<C> {
    conn: Arc<C>,
}

impl<C> SeaUserRepository<C> {
    /// Create new repository instance
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

fn to_active_model(person: &Person) -> ActiveModel {
    ActiveModel {
        id: match person.id {
            Some(id) => Set(id),
            None => ActiveValue::NotSet,
        },
        full_name: Set(person.full_name.clone()),
        title: Set(person.title.clone()),
        age: Set(i64::from(person.age)),
        status: Set(person.status.clone()),
    }
}

#[async_trait]
impl<C> UserRepository for SeaUserRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn save(&self, person: Person) -> AppResult<Person> {
        let conn = self.conn.as_ref();
        let active_model = to_active_model(&person);

        let model = match person.id {
            None => active_model.insert(conn).await?,
            Some(id) => {
                // A caller-supplied identity replaces the row, or creates it
                let exists = PersonEntity::find_by_id(id).one(conn).await?.is_some();
                if exists {
                    active_model.update(conn).await?
                } else {
                    let model = active_model.insert(conn).await?;
                    advance_id_sequence::<PersonEntity, _>(conn, id).await?;
                    model
                }
            }
        };

        Person::try_from(model)
    }

    async fn find_by_id(&self, id: EntityId) -> AppResult<Person> {
        let model = PersonEntity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(AppError::from)?
            .ok_or_not_found(Person::KIND, id)?;

        Person::try_from(model)
    }

    async fn find_by_id_for_update(&self, id: EntityId) -> AppResult<Person> {
        let model = PersonEntity::find_by_id(id)
            .lock_exclusive()
            .one(self.conn.as_ref())
            .await
            .map_err(AppError::from)?
            .ok_or_not_found(Person::KIND, id)?;

        Person::try_from(model)
    }

    async fn delete_by_id(&self, id: EntityId) -> AppResult<()> {
        let result = PersonEntity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(Person::KIND, id));
        }

        Ok(())
    }

    async fn find_all(&self) -> AppResult<Vec<Person>> {
        let models = PersonEntity::find()
            .order_by_asc(person::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(Person::try_from).collect()
    }
}
