//! Unified error handling.
//!
//! Provides a single error type raised by stores, services and the
//! orchestration layer. Conditions propagate unchanged to the caller, which
//! decides how to present them.

use domain::{DomainError, EntityId};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Resource errors
    #[error("{0}")]
    NotFound(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::NotFound(_) => "NOT_FOUND",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::InvalidArgument(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, AppError::InvalidArgument(_))
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingOwner { .. } => AppError::InvalidArgument(err.to_string()),
            // Only stored rows carry out-of-range numbers
            DomainError::OutOfRange { .. } => AppError::Internal(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidArgument(errors.to_string())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, kind: &str, id: EntityId) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, kind: &str, id: EntityId) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(kind, id))
    }
}

/// Convenience constructors
impl AppError {
    /// `NotFound` for an identity lookup, e.g. "Book with id=3 not found"
    pub fn not_found(kind: &str, id: EntityId) -> Self {
        AppError::NotFound(format!("{} with id={} not found", kind, id))
    }

    pub fn missing_id(kind: &str) -> Self {
        AppError::NotFound(format!("{} without id cannot be resolved", kind))
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        AppError::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
