//! Repository layer for data access.
//!
//! `UserRepository` and `BookRepository` are the persistence providers the
//! services consume. Each has an in-memory implementation (`memory`) and a
//! relational one over sea-orm; callers cannot tell them apart.

mod book_repository;
pub mod entities;
pub mod memory;
mod sequence;
mod user_repository;

pub use book_repository::{BookRepository, SeaBookRepository};
pub use memory::{BookStore, EntityStore, StagedStore, Store, UserStore};
pub use user_repository::{SeaUserRepository, UserRepository};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use book_repository::MockBookRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
