//! Library Service Library
//!
//! Users and the books they own, kept either in memory or in a relational
//! database. `UserBookFacade` is the entry point; it runs every compound
//! workflow as one transaction on the configured backend.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::LibraryConfig;
use crate::infra::{Database, MemoryUnitOfWork, Persistence, UnitOfWork};
use crate::service::{UserBookFacade, UserBookManager};
use common::{AppError, AppResult, StorageBackend};
use domain::{BookRequest, UserBookRequest, UserBookResponse, UserRequest};

/// Build the unit of work for the configured storage backend.
///
/// The database backend connects and applies pending migrations first.
pub async fn build_unit_of_work(config: &LibraryConfig) -> AppResult<Arc<dyn UnitOfWork>> {
    info!(storage = %config.storage, "Building unit of work");

    match config.storage {
        StorageBackend::Memory => Ok(Arc::new(MemoryUnitOfWork::new())),
        StorageBackend::Database => {
            let db = Database::connect(&config.database).await?;
            Ok(Arc::new(Persistence::new(db.into_connection())))
        }
    }
}

/// Build the user/book facade for the configured storage backend.
pub async fn build_facade(config: &LibraryConfig) -> AppResult<Arc<dyn UserBookFacade>> {
    let uow = build_unit_of_work(config).await?;
    Ok(Arc::new(UserBookManager::new(uow)))
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &LibraryConfig, action: MigrateAction) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables");
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Check that the configured database answers.
pub async fn ping(config: &LibraryConfig) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database).await?;
    db.ping().await?;
    info!("Database reachable");
    Ok(())
}

/// Walk one user with two books through every facade workflow.
///
/// Returns the responses of create, get and update, in that order; the user
/// and its books are deleted again before returning.
pub async fn run_demo(facade: &dyn UserBookFacade) -> AppResult<Vec<UserBookResponse>> {
    let request = UserBookRequest::new(
        UserRequest {
            full_name: "Ann Smith".to_string(),
            title: "reader".to_string(),
            age: 30,
            ..Default::default()
        },
        vec![
            BookRequest {
                title: "A".to_string(),
                author: "X".to_string(),
                page_count: 100,
                ..Default::default()
            },
            BookRequest {
                title: "B".to_string(),
                author: "Y".to_string(),
                page_count: 200,
                ..Default::default()
            },
        ],
    );

    let created = facade.create_user_with_books(request.clone()).await?;
    let fetched = facade.get_user_with_books(created.user_id).await?;

    let mut update = request;
    if let Some(user) = update.user_request.as_mut() {
        user.id = Some(created.user_id);
        user.title = "librarian".to_string();
    }
    if let Some(books) = update.book_requests.as_mut() {
        for (book, id) in books.iter_mut().flatten().zip(&created.books_id_list) {
            book.id = Some(*id);
            book.page_count += 1;
        }
    }
    let updated = facade.update_user_with_books(update).await?;

    facade.delete_user_with_books(created.user_id).await?;
    match facade.get_user_with_books(created.user_id).await {
        Err(AppError::NotFound(_)) => {}
        Ok(_) => return Err(AppError::internal("deleted user is still present")),
        Err(e) => return Err(e),
    }

    Ok(vec![created, fetched, updated])
}
