//! SQLite implementations of the storage traits

pub mod artifacts;
pub mod library;
pub mod users;

pub use artifacts::SqliteArtifactRepository;
pub use library::SqliteLibraryRepository;
pub use users::SqliteUserRepository;

use uuid::Uuid;

use crate::{Error, Result};

/// True when a statement failed on a UNIQUE or PRIMARY KEY constraint
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Parse a UUID stored as TEXT
pub(crate) fn parse_uuid(column: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| Error::Internal(format!("Invalid UUID in {}: '{}' ({})", column, value, e)))
}
