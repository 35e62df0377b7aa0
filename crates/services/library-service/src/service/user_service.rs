//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Validates user input and translates between DTOs and
//! stored people; persistence is delegated to the repository.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{Entity, EntityId, Person, UserDto};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Store a new user and return it with its generated identity.
    ///
    /// A DTO that already carries an identity is rejected with
    /// `InvalidArgument`.
    async fn create_user(&self, dto: UserDto) -> AppResult<UserDto>;

    /// Overwrite name, title, age (and status when given) of an existing user
    async fn update_user(&self, dto: UserDto) -> AppResult<UserDto>;

    /// Get user by ID
    async fn get_user_by_id(&self, id: EntityId) -> AppResult<UserDto>;

    /// Delete user by ID
    async fn delete_user_by_id(&self, id: EntityId) -> AppResult<()>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<UserDto>>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, dto: UserDto) -> AppResult<UserDto> {
        dto.validate()?;
        // Identities of new users are always generated
        if let Some(id) = dto.id {
            return Err(AppError::invalid_argument(format!(
                "New {} cannot carry id={}",
                Person::KIND,
                id
            )));
        }
        tracing::debug!(?dto, "Creating user");

        let person = self.repo.save(Person::from(dto)).await?;
        tracing::info!(user_id = ?person.id, "Saved user");

        Ok(UserDto::from(person))
    }

    async fn update_user(&self, dto: UserDto) -> AppResult<UserDto> {
        dto.validate()?;
        let id = dto.id.ok_or_else(|| AppError::missing_id(Person::KIND))?;

        let mut person = self.repo.find_by_id_for_update(id).await?;
        tracing::debug!(user_id = id, ?person, "Found user to update");

        person.overwrite_with(&dto);
        let person = self.repo.save(person).await?;
        tracing::info!(user_id = id, "Updated user");

        Ok(UserDto::from(person))
    }

    async fn get_user_by_id(&self, id: EntityId) -> AppResult<UserDto> {
        let person = self.repo.find_by_id(id).await?;
        tracing::debug!(user_id = id, ?person, "Found user");
        Ok(UserDto::from(person))
    }

    async fn delete_user_by_id(&self, id: EntityId) -> AppResult<()> {
        self.repo.delete_by_id(id).await?;
        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<UserDto>> {
        let people = self.repo.find_all().await?;
        Ok(people.into_iter().map(UserDto::from).collect())
    }
}
