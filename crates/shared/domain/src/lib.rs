//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Entities are the stored form; DTOs and requests are the forms exchanged
//! with callers of the service layer.

pub mod book;
pub mod constants;
pub mod entity;
pub mod error;
pub mod user;
pub mod user_book;

pub use book::{Book, BookDto, BookRequest};
pub use constants::*;
pub use entity::{Entity, EntityId};
pub use error::{stored_count, DomainError, DomainResult};
pub use user::{Person, UserDto, UserRequest};
pub use user_book::{UserBookRequest, UserBookResponse};
