//! Book repository contract and its relational implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::entities::book::{self, ActiveModel, Entity as BookEntity};
use super::sequence::advance_id_sequence;
use common::{AppError, AppResult, OptionExt};
use domain::{Book, Entity, EntityId};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistence provider for books.
///
/// Lookups and deletes of an absent identity fail with `NotFound`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert when the book has no identity, otherwise replace the stored entry
    async fn save(&self, book: Book) -> AppResult<Book>;

    /// Find book by ID
    async fn find_by_id(&self, id: EntityId) -> AppResult<Book>;

    /// Find book by ID and lock it for the rest of the current transaction
    async fn find_by_id_for_update(&self, id: EntityId) -> AppResult<Book>;

    /// Delete book by ID
    async fn delete_by_id(&self, id: EntityId) -> AppResult<()>;

    /// All books owned by a person, ordered by identity
    async fn find_all_by_owner_id(&self, owner_id: EntityId) -> AppResult<Vec<Book>>;
}

/// SeaORM implementation, usable over a plain connection or a transaction
pub struct SeaBookRepository<C> {
    conn: Arc<C>,
}

impl<C> SeaBookRepository<C> {
    /// Create new repository instance
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

fn to_active_model(book: &Book) -> ActiveModel {
    ActiveModel {
        id: match book.id {
            Some(id) => Set(id),
            None => ActiveValue::NotSet,
        },
        person_id: Set(book.person_id),
        title: Set(book.title.clone()),
        author: Set(book.author.clone()),
        page_count: Set(i64::from(book.page_count)),
    }
}

#[async_trait]
impl<C> BookRepository for SeaBookRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn save(&self, book: Book) -> AppResult<Book> {
        let conn = self.conn.as_ref();
        let active_model = to_active_model(&book);

        let model = match book.id {
            None => active_model.insert(conn).await?,
            Some(id) => {
                let exists = BookEntity::find_by_id(id).one(conn).await?.is_some();
                if exists {
                    active_model.update(conn).await?
                } else {
                    let model = active_model.insert(conn).await?;
                    advance_id_sequence::<BookEntity, _>(conn, id).await?;
                    model
                }
            }
        };

        Book::try_from(model)
    }

    async fn find_by_id(&self, id: EntityId) -> AppResult<Book> {
        let model = BookEntity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(AppError::from)?
            .ok_or_not_found(Book::KIND, id)?;

        Book::try_from(model)
    }

    async fn find_by_id_for_update(&self, id: EntityId) -> AppResult<Book> {
        let model = BookEntity::find_by_id(id)
            .lock_exclusive()
            .one(self.conn.as_ref())
            .await
            .map_err(AppError::from)?
            .ok_or_not_found(Book::KIND, id)?;

        Book::try_from(model)
    }

    async fn delete_by_id(&self, id: EntityId) -> AppResult<()> {
        let result = BookEntity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(Book::KIND, id));
        }

        Ok(())
    }

    async fn find_all_by_owner_id(&self, owner_id: EntityId) -> AppResult<Vec<Book>> {
        let models = BookEntity::find()
            .filter(book::Column::PersonId.eq(owner_id))
            .order_by_asc(book::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(Book::try_from).collect()
    }
}
