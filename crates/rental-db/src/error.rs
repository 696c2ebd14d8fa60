//! # Database Error Types
//!
//! Error types for Car Store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (rental-api) ← Domain vs storage split                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError ← HTTP status + JSON body                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rental_core::{CoreError, ValidationError};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (duplicate registration).
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Conditional rent update matched the row but it was not available.
    #[error("Car {0} is already rented")]
    AlreadyRented(String),

    /// Conditional return update matched the row but it was not rented.
    #[error("Car {0} is not rented")]
    NotRented(String),

    /// The write was refused because the resulting value is out of range.
    #[error("Invalid value: {0}")]
    InvalidValue(ValidationError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin, commit or roll back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use past the acquire timeout).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns true for failures of the storage itself rather than of the
    /// request (missing row, duplicate key, wrong rental state).
    pub fn is_storage_failure(&self) -> bool {
        !matches!(
            self,
            DbError::NotFound { .. }
                | DbError::UniqueViolation { .. }
                | DbError::AlreadyRented(_)
                | DbError::NotRented(_)
                | DbError::InvalidValue(_)
        )
    }
}

/// Rental rule violations detected while inspecting a row.
impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CarNotFound(registration) => DbError::not_found("Car", registration),
            CoreError::DuplicateRegistration(registration) => {
                DbError::duplicate("registration", registration)
            }
            CoreError::AlreadyRented(registration) => DbError::AlreadyRented(registration),
            CoreError::NotRented(registration) => DbError::NotRented(registration),
            CoreError::Validation(err) => DbError::InvalidValue(err),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → UNIQUE constraint → UniqueViolation, else QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports primary key collisions as
                // "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_failure_classification() {
        assert!(!DbError::not_found("Car", "ABC123").is_storage_failure());
        assert!(!DbError::duplicate("registration", "ABC123").is_storage_failure());
        assert!(!DbError::NotRented("ABC123".into()).is_storage_failure());
        assert!(DbError::PoolExhausted.is_storage_failure());
        assert!(DbError::QueryFailed("disk I/O error".into()).is_storage_failure());
    }

    #[test]
    fn test_pool_errors_map() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_rule_violations_map() {
        assert!(matches!(
            DbError::from(CoreError::AlreadyRented("ABC123".into())),
            DbError::AlreadyRented(ref r) if r == "ABC123"
        ));
        assert!(matches!(
            DbError::from(CoreError::CarNotFound("NOPE".into())),
            DbError::NotFound { ref id, .. } if id == "NOPE"
        ));

        let err = DbError::from(CoreError::Validation(ValidationError::TooLarge {
            field: "mileage".into(),
            max: i64::MAX,
        }));
        assert!(matches!(err, DbError::InvalidValue(_)));
        assert!(!err.is_storage_failure());
    }
}
