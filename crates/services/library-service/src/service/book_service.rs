//! Book service - Handles book-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{Book, BookDto, Entity, EntityId};

use crate::repository::{BookRepository, UserRepository};

/// Book service trait for dependency injection.
#[async_trait]
pub trait BookService: Send + Sync {
    /// Store a new book for an existing owner; the identity is always generated
    async fn create_book(&self, dto: BookDto) -> AppResult<BookDto>;

    /// Overwrite title, author and page count of an existing book
    async fn update_book(&self, dto: BookDto) -> AppResult<BookDto>;

    /// Get book by ID
    async fn get_book_by_id(&self, id: EntityId) -> AppResult<BookDto>;

    /// Delete book by ID
    async fn delete_book_by_id(&self, id: EntityId) -> AppResult<()>;

    /// All books owned by a user, ordered by identity
    async fn find_books_by_owner_id(&self, owner_id: EntityId) -> AppResult<Vec<BookDto>>;
}

/// Concrete implementation of BookService.
///
/// Holds the user repository as well, to check that a new book's owner
/// exists before it is stored.
pub struct BookManager {
    books: Arc<dyn BookRepository>,
    users: Arc<dyn UserRepository>,
}

impl BookManager {
    pub fn new(books: Arc<dyn BookRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { books, users }
    }
}

#[async_trait]
impl BookService for BookManager {
    async fn create_book(&self, dto: BookDto) -> AppResult<BookDto> {
        dto.validate()?;
        if let Some(id) = dto.id {
            return Err(AppError::invalid_argument(format!(
                "New {} cannot carry id={}",
                Book::KIND,
                id
            )));
        }
        let book = Book::try_from(dto)?;
        tracing::debug!(?book, "Mapped book");

        self.users.find_by_id(book.person_id).await?;

        let book = self.books.save(book).await?;
        tracing::info!(book_id = ?book.id, user_id = book.person_id, "Saved book");

        Ok(BookDto::from(book))
    }

    async fn update_book(&self, dto: BookDto) -> AppResult<BookDto> {
        dto.validate()?;
        let id = dto.id.ok_or_else(|| AppError::missing_id(Book::KIND))?;

        let mut book = self.books.find_by_id_for_update(id).await?;
        tracing::debug!(book_id = id, ?book, "Found book to update");

        // Ownership never changes; a book of another user is treated as absent
        if let Some(owner_id) = dto.user_id {
            if owner_id != book.person_id {
                tracing::warn!(book_id = id, user_id = owner_id, "Book belongs to another user");
                return Err(AppError::NotFound(format!(
                    "Book with id={} not found for user id={}",
                    id, owner_id
                )));
            }
        }

        book.overwrite_with(&dto);
        let book = self.books.save(book).await?;
        tracing::info!(book_id = id, "Updated book");

        Ok(BookDto::from(book))
    }

    async fn get_book_by_id(&self, id: EntityId) -> AppResult<BookDto> {
        let book = self.books.find_by_id(id).await?;
        tracing::debug!(book_id = id, ?book, "Found book");
        Ok(BookDto::from(book))
    }

    async fn delete_book_by_id(&self, id: EntityId) -> AppResult<()> {
        self.books.delete_by_id(id).await?;
        tracing::info!(book_id = id, "Deleted book");
        Ok(())
    }

    async fn find_books_by_owner_id(&self, owner_id: EntityId) -> AppResult<Vec<BookDto>> {
        let books = self.books.find_all_by_owner_id(owner_id).await?;
        tracing::debug!(user_id = owner_id, count = books.len(), "Found books of user");
        Ok(books.into_iter().map(BookDto::from).collect())
    }
}
