//! Error handling for recordx-store
//!
//! Wraps recordx-core ExError with store-specific helpers

use recordx_core::entity::EntityId;
use recordx_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error for an already applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a serialization error for stored attribute JSON
pub fn from_serde(op: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// Create an error for an entity type with no `entity_types` row
pub fn undefined_type(entity_type: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_entity_type(entity_type)
        .with_message(format!("entity type {} is not defined", entity_type))
}

/// Create an error for an id that is not a SQLite integer key
pub fn invalid_id(id: &EntityId) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_entity_id(id.as_str())
        .with_message(format!("id {} is not an integer key", id))
}
