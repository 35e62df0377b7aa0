//! Book entity and the user-facing types mapped onto it.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Entity, EntityId};
use crate::error::DomainError;

/// Stored book record, always owned by one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<EntityId>,
    /// Owning person; fixed at creation
    pub person_id: EntityId,
    pub title: String,
    pub author: String,
    pub page_count: u32,
}

impl Book {
    /// Overwrite title, author and page count. Owner and identity are kept.
    pub fn overwrite_with(&mut self, dto: &BookDto) {
        self.title = dto.title.clone();
        self.author = dto.author.clone();
        self.page_count = dto.page_count;
    }
}

impl Entity for Book {
    const KIND: &'static str = "Book";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn owner_id(&self) -> Option<EntityId> {
        Some(self.person_id)
    }
}

/// Book data transfer object exchanged with the service layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BookDto {
    pub id: Option<EntityId>,
    pub user_id: Option<EntityId>,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 255, message = "Author is too long"))]
    pub author: String,
    pub page_count: u32,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            user_id: Some(book.person_id),
            title: book.title,
            author: book.author,
            page_count: book.page_count,
        }
    }
}

impl TryFrom<BookDto> for Book {
    type Error = DomainError;

    fn try_from(dto: BookDto) -> Result<Self, Self::Error> {
        let person_id = dto
            .user_id
            .ok_or(DomainError::MissingOwner { kind: Book::KIND })?;

        Ok(Self {
            id: dto.id,
            person_id,
            title: dto.title,
            author: dto.author,
            page_count: dto.page_count,
        })
    }
}

/// Book part of an incoming request.
///
/// Carries no owner: the owner is always taken from the user resolved in
/// the same request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub page_count: u32,
}

impl BookRequest {
    /// Map to a DTO owned by `owner_id`.
    pub fn into_dto(self, owner_id: EntityId) -> BookDto {
        BookDto {
            id: self.id,
            user_id: Some(owner_id),
            title: self.title,
            author: self.author,
            page_count: self.page_count,
        }
    }
}
