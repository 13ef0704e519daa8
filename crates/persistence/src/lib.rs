//! # Formgate Persistence
//!
//! Persistence layer cho Formgate - SQLite qua sqlx.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                   Database                    │
//! │  ┌─────────────┐          ┌────────────────┐  │
//! │  │   SQLite    │ <──────> │     Repos      │  │
//! │  │ (accounts,  │          │ (AccountRepo,  │  │
//! │  │   forms)    │          │   FormRepo)    │  │
//! │  └─────────────┘          └────────────────┘  │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formgate_persistence::{Database, FormRepo};
//!
//! let db = Database::connect("sqlite:data/formgate.db?mode=rwc").await?;
//! let forms = FormRepo::list_by_owner(db.pool(), owner_id).await?;
//! ```

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::schema::{AccountRow, FormRow, FormWithOwnerRow, NewAccountRow, NewFormRow};
pub use sqlite::{create_pool, init_database, run_migrations, AccountRepo, FormRepo};

use sqlx::SqlitePool;
use std::path::Path;

/// Database facade
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Kết nối và chạy migrations
    ///
    /// # Arguments
    /// * `db_url` - SQLite database URL (e.g., "sqlite:data/formgate.db?mode=rwc")
    pub async fn connect(db_url: &str) -> PersistenceResult<Self> {
        let pool = init_database(db_url).await?;
        Ok(Self { pool })
    }

    /// Mở database file theo đường dẫn, tạo mới nếu chưa có
    pub async fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let url = format!("sqlite:{}", path.as_ref().display());
        Self::connect(&url).await
    }

    /// Tạo từ pool có sẵn (schema phải đã được migrate)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Đóng tất cả connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
