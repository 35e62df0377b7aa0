//! Person entity and the user-facing types mapped onto it.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::STATUS_ACTIVE;
use crate::entity::{Entity, EntityId};

/// Stored person record. Owns zero or more books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: Option<EntityId>,
    pub full_name: String,
    pub title: String,
    pub age: u32,
    /// Free-text lifecycle label, e.g. "ACTIVE"
    pub status: String,
}

impl Person {
    /// Overwrite the mutable fields from an update payload.
    ///
    /// Identity is kept; status only changes when the payload carries one.
    pub fn overwrite_with(&mut self, dto: &UserDto) {
        self.full_name = dto.full_name.clone();
        self.title = dto.title.clone();
        self.age = dto.age;
        if let Some(status) = &dto.status {
            self.status = status.clone();
        }
    }
}

impl Entity for Person {
    const KIND: &'static str = "User";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}

/// User data transfer object exchanged with the service layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserDto {
    pub id: Option<EntityId>,
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(max = 255, message = "Title is too long"))]
    pub title: String,
    pub age: u32,
    #[validate(length(max = 255, message = "Status is too long"))]
    pub status: Option<String>,
}

impl From<Person> for UserDto {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            full_name: person.full_name,
            title: person.title,
            age: person.age,
            status: Some(person.status),
        }
    }
}

impl From<UserDto> for Person {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            full_name: dto.full_name,
            title: dto.title,
            age: dto.age,
            status: dto
                .status
                .filter(|status| !status.is_empty())
                .unwrap_or_else(|| STATUS_ACTIVE.to_string()),
        }
    }
}

/// User part of an incoming request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub full_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub age: u32,
}

impl From<UserRequest> for UserDto {
    fn from(request: UserRequest) -> Self {
        Self {
            id: request.id,
            full_name: request.full_name,
            title: request.title,
            age: request.age,
            status: request.status,
        }
    }
}
