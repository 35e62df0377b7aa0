//! In-memory storage backend.
//!
//! `EntityStore` is the keyed map for one entity kind; `StagedStore` layers
//! uncommitted writes over it for the duration of a transaction. `UserStore`
//! and `BookStore` expose either of them through the repository traits.

mod book_store;
mod entity_store;
mod staged_store;
mod store;
mod user_store;

pub use book_store::BookStore;
pub use entity_store::EntityStore;
pub use staged_store::StagedStore;
pub use store::Store;
pub use user_store::UserStore;
