//! Errors raised while building entities from outside input.

use thiserror::Error;

/// Why a value could not become a domain entity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An owned entity arrived without its owner
    #[error("{kind} owner is required")]
    MissingOwner { kind: &'static str },

    /// A stored number does not fit the entity's field
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Narrow a stored count (age, page count) to its domain type.
pub fn stored_count(field: &'static str, value: i64) -> DomainResult<u32> {
    u32::try_from(value).map_err(|_| DomainError::OutOfRange { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_count_rejects_negative_and_huge_values() {
        assert_eq!(stored_count("age", 42), Ok(42));
        assert_eq!(
            stored_count("age", -1),
            Err(DomainError::OutOfRange { field: "age", value: -1 })
        );
        assert!(stored_count("page_count", i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_missing_owner_message() {
        let err = DomainError::MissingOwner { kind: "Book" };
        assert_eq!(err.to_string(), "Book owner is required");
    }
}
