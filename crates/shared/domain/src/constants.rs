//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Person lifecycle
// =============================================================================

/// Status assigned to a person created without one
pub const STATUS_ACTIVE: &str = "ACTIVE";

// =============================================================================
// Identity
// =============================================================================

/// First identity handed out by a fresh entity sequence
pub const FIRST_ENTITY_ID: i64 = 1;

// =============================================================================
// Validation
// =============================================================================

/// Column width for text fields; DTO validation uses the same bound
pub const MAX_TEXT_LENGTH: u32 = 255;
