//! User-with-books workflows.
//!
//! Each workflow composes `UserService` and `BookService` inside one
//! transaction: it either takes effect completely or not at all. The owner of
//! every book written here is the user resolved in the same workflow; any
//! owner the caller supplied is overwritten, and create workflows refuse
//! identities supplied by the caller.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult};
use domain::{BookRequest, EntityId, UserBookRequest, UserBookResponse, UserDto, UserRequest};

use super::book_service::{BookManager, BookService};
use super::user_service::{UserManager, UserService};
use crate::infra::{in_transaction, TransactionContext, UnitOfWork};

/// Compound user/book operations.
#[async_trait]
pub trait UserBookFacade: Send + Sync {
    /// Create the user, then each listed book owned by it
    async fn create_user_with_books(&self, request: UserBookRequest) -> AppResult<UserBookResponse>;

    /// Update the user, then each listed book, keeping them owned by it
    async fn update_user_with_books(&self, request: UserBookRequest) -> AppResult<UserBookResponse>;

    /// The user's identity and the identities of every book it owns
    async fn get_user_with_books(&self, user_id: EntityId) -> AppResult<UserBookResponse>;

    /// Delete every book the user owns, then the user
    async fn delete_user_with_books(&self, user_id: EntityId) -> AppResult<()>;
}

/// `UserBookFacade` over any unit of work.
pub struct UserBookManager<U: ?Sized> {
    uow: Arc<U>,
}

impl<U: UnitOfWork + ?Sized> UserBookManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Services bound to the repositories of one transaction.
struct Services {
    users: UserManager,
    books: BookManager,
}

impl From<TransactionContext> for Services {
    fn from(ctx: TransactionContext) -> Self {
        Self {
            users: UserManager::new(ctx.users.clone()),
            books: BookManager::new(ctx.books, ctx.users),
        }
    }
}

fn required_user(user: Option<UserRequest>) -> AppResult<UserDto> {
    user.map(UserDto::from)
        .ok_or_else(|| AppError::invalid_argument("User request can't be null"))
}

/// `None` entries stay in the list; workflows skip them.
fn required_books(books: Option<Vec<Option<BookRequest>>>) -> AppResult<Vec<Option<BookRequest>>> {
    books.ok_or_else(|| AppError::invalid_argument("List of books can't be null"))
}

#[async_trait]
impl<U: UnitOfWork + ?Sized> UserBookFacade for UserBookManager<U> {
    async fn create_user_with_books(&self, request: UserBookRequest) -> AppResult<UserBookResponse> {
        tracing::info!("Creating user with books");

        let response = in_transaction(self.uow.as_ref(), |ctx| async move {
            let services = Services::from(ctx);
            let user_dto = required_user(request.user_request)?;

            let user = services.users.create_user(user_dto).await?;
            let user_id = user
                .id
                .ok_or_else(|| AppError::internal("created user has no identity"))?;
            tracing::info!(user_id, "User created");

            // Checked after the user is written; the rollback undoes it
            let book_requests = required_books(request.book_requests)?;

            let mut books_id_list = Vec::with_capacity(book_requests.len());
            for book_request in book_requests.into_iter().flatten() {
                let book = services.books.create_book(book_request.into_dto(user_id)).await?;
                if let Some(id) = book.id {
                    books_id_list.push(id);
                }
            }
            tracing::info!(user_id, books = books_id_list.len(), "Books created");

            Ok(UserBookResponse {
                user_id,
                books_id_list,
            })
        })
        .await?;

        tracing::info!(user_id = response.user_id, "User with books created");
        Ok(response)
    }

    async fn update_user_with_books(&self, request: UserBookRequest) -> AppResult<UserBookResponse> {
        tracing::info!("Updating user with books");

        let response = in_transaction(self.uow.as_ref(), |ctx| async move {
            let services = Services::from(ctx);
            let user_dto = required_user(request.user_request)?;
            let book_requests = required_books(request.book_requests)?;

            let user = services.users.update_user(user_dto).await?;
            let user_id = user
                .id
                .ok_or_else(|| AppError::internal("updated user has no identity"))?;
            tracing::info!(user_id, "User updated");

            let mut books_id_list = Vec::with_capacity(book_requests.len());
            for book_request in book_requests.into_iter().flatten() {
                let book = services.books.update_book(book_request.into_dto(user_id)).await?;
                if let Some(id) = book.id {
                    books_id_list.push(id);
                }
            }
            tracing::info!(user_id, books = books_id_list.len(), "Books updated");

            Ok(UserBookResponse {
                user_id,
                books_id_list,
            })
        })
        .await?;

        tracing::info!(user_id = response.user_id, "User with books updated");
        Ok(response)
    }

    async fn get_user_with_books(&self, user_id: EntityId) -> AppResult<UserBookResponse> {
        tracing::info!(user_id, "Fetching user with books");

        in_transaction(self.uow.as_ref(), |ctx| async move {
            let services = Services::from(ctx);
            services.users.get_user_by_id(user_id).await?;

            let books_id_list = services
                .books
                .find_books_by_owner_id(user_id)
                .await?
                .into_iter()
                .filter_map(|book| book.id)
                .collect();

            Ok(UserBookResponse {
                user_id,
                books_id_list,
            })
        })
        .await
    }

    async fn delete_user_with_books(&self, user_id: EntityId) -> AppResult<()> {
        tracing::info!(user_id, "Deleting user with books");

        in_transaction(self.uow.as_ref(), |ctx| async move {
            let services = Services::from(ctx);

            let books = services.books.find_books_by_owner_id(user_id).await?;
            for id in books.iter().filter_map(|book| book.id) {
                services.books.delete_book_by_id(id).await?;
            }
            tracing::info!(user_id, books = books.len(), "Books deleted");

            services.users.delete_user_by_id(user_id).await
        })
        .await?;

        tracing::info!(user_id, "User with books deleted");
        Ok(())
    }
}
