//! Compound request/response for workflows spanning a user and its books.

use serde::{Deserialize, Serialize};

use crate::book::BookRequest;
use crate::entity::EntityId;
use crate::user::UserRequest;

/// A user together with the books it should own.
///
/// Both parts are optional on the wire; missing parts are rejected by the
/// workflows rather than by deserialization. `null` entries inside the book
/// list are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookRequest {
    #[serde(default)]
    pub user_request: Option<UserRequest>,
    #[serde(default)]
    pub book_requests: Option<Vec<Option<BookRequest>>>,
}

impl UserBookRequest {
    pub fn new(user: UserRequest, books: Vec<BookRequest>) -> Self {
        Self {
            user_request: Some(user),
            book_requests: Some(books.into_iter().map(Some).collect()),
        }
    }
}

/// Identity of a user and of the books touched alongside it, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookResponse {
    pub user_id: EntityId,
    pub books_id_list: Vec<EntityId>,
}
