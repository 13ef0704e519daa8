//! # Persistence Errors
//!
//! Error types cho persistence layer, wrapping sqlx và serde_json errors.

use thiserror::Error;

/// SQLite primary result codes cho lỗi tạm thời (lock contention)
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity} with id {id}")]
    AlreadyExists { entity: String, id: String },

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    // === Payload errors ===
    #[error("Form payload serialization error: {0}")]
    PayloadSerialization(#[from] serde_json::Error),
}

/// Result type alias cho PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    /// Tạo NotFound error
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Tạo AlreadyExists error
    pub fn already_exists(entity: &str, id: impl ToString) -> Self {
        Self::AlreadyExists {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Lỗi tạm thời (SQLITE_BUSY / SQLITE_LOCKED và các extended code của chúng).
    ///
    /// Caller có thể chạy lại toàn bộ transaction.
    pub fn is_transient(&self) -> bool {
        let Self::Database(err) = self else {
            return false;
        };
        if matches!(err, sqlx::Error::PoolTimedOut) {
            return true;
        }
        err.as_database_error()
            .and_then(|db| db.code())
            .and_then(|code| code.parse::<i32>().ok())
            .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
            .unwrap_or(false)
    }

    /// Unique constraint bị vi phạm
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::AlreadyExists { .. } => true,
            Self::Database(err) => err
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Foreign key constraint bị vi phạm
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Self::ForeignKeyViolation(_) => true,
            Self::Database(err) => err
                .as_database_error()
                .map(|db| db.is_foreign_key_violation())
                .unwrap_or(false),
            _ => false,
        }
    }
}
