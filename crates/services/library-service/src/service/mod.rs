//! Application services layer - Use cases and business logic.
//!
//! Services validate input and map between DTOs and stored entities. The
//! facade composes them into workflows that run inside one transaction.

mod book_service;
mod facade;
mod user_service;

pub use book_service::{BookManager, BookService};
pub use facade::{UserBookFacade, UserBookManager};
pub use user_service::{UserManager, UserService};
