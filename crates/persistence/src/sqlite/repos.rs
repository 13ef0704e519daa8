//! Repository implementations cho SQLite
//!
//! Các hàm nhận `Executor` generic để chạy được trên cả pool lẫn
//! connection của một transaction đang mở.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use formgate_core::{StagePatch, Tier};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

const FORM_WITH_OWNER_SELECT: &str = r#"
    SELECT f.*, a.phone_number AS owner_phone, a.user_name AS owner_name
    FROM form_submissions f
    JOIN accounts a ON a.id = f.owner_id
"#;

// ============================================================================
// Account Repository
// ============================================================================

/// Repository cho accounts table
pub struct AccountRepo;

impl AccountRepo {
    /// Thêm account mới, phone_number trùng -> AlreadyExists
    pub async fn insert(pool: &SqlitePool, account: &NewAccountRow) -> PersistenceResult<AccountRow> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (phone_number, user_name, credential_hash, credential_salt, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&account.phone_number)
        .bind(&account.user_name)
        .bind(&account.credential_hash)
        .bind(&account.credential_salt)
        .bind(account.created_at)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            let err = PersistenceError::from(e);
            if err.is_unique_violation() {
                PersistenceError::already_exists("Account", &account.phone_number)
            } else {
                err
            }
        })
    }

    /// Lấy account theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<AccountRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", id))
    }

    /// Lấy account theo số điện thoại
    pub async fn get_by_phone<'e, E>(executor: E, phone_number: &str) -> PersistenceResult<AccountRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE phone_number = ?")
            .bind(phone_number)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", phone_number))
    }

    /// Kiểm tra account tồn tại
    pub async fn exists<'e, E>(executor: E, id: i64) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(row.0 > 0)
    }

    /// Lấy tất cả accounts
    pub async fn get_all(pool: &SqlitePool) -> PersistenceResult<Vec<AccountRow>> {
        let rows = sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Đếm accounts
    pub async fn count(pool: &SqlitePool) -> PersistenceResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Form Repository
// ============================================================================

/// Repository cho form_submissions table
pub struct FormRepo;

impl FormRepo {
    /// Tạo submission mới.
    ///
    /// Kiểm tra owner và insert trong cùng một statement; owner không tồn tại
    /// -> NotFound và không có row nào được tạo.
    pub async fn create(pool: &SqlitePool, form: &NewFormRow) -> PersistenceResult<FormRow> {
        let form_data = serde_json::to_string(&form.payload)?;

        sqlx::query_as::<_, FormRow>(
            r#"
            INSERT INTO form_submissions (owner_id, form_type, form_data, enter_date_and_time, submitted_at)
            SELECT ?, ?, ?, ?, ?
            WHERE EXISTS (SELECT 1 FROM accounts WHERE id = ?)
            RETURNING *
            "#,
        )
        .bind(form.owner_id)
        .bind(&form.form_type)
        .bind(&form_data)
        .bind(&form.enter_date_and_time)
        .bind(form.submitted_at)
        .bind(form.owner_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            let err = PersistenceError::from(e);
            if err.is_foreign_key_violation() {
                PersistenceError::not_found("Account", form.owner_id)
            } else {
                err
            }
        })?
        .ok_or_else(|| PersistenceError::not_found("Account", form.owner_id))
    }

    /// Lấy submission theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<FormRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, FormRow>("SELECT * FROM form_submissions WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("FormSubmission", id))
    }

    /// Lấy submission kèm owner
    pub async fn get_with_owner<'e, E>(executor: E, id: i64) -> PersistenceResult<FormWithOwnerRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{FORM_WITH_OWNER_SELECT} WHERE f.id = ?");
        sqlx::query_as::<_, FormWithOwnerRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("FormSubmission", id))
    }

    /// Lấy submissions của owner theo thứ tự tạo
    pub async fn list_by_owner<'e, E>(executor: E, owner_id: i64) -> PersistenceResult<Vec<FormRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, FormRow>(
            "SELECT * FROM form_submissions WHERE owner_id = ? ORDER BY id ASC",
        )
        .bind(owner_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Lấy submissions kèm owner, của một owner hoặc tất cả, theo thứ tự tạo
    pub async fn list_with_owner<'e, E>(
        executor: E,
        owner_id: Option<i64>,
    ) -> PersistenceResult<Vec<FormWithOwnerRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = match owner_id {
            Some(owner_id) => {
                let sql = format!("{FORM_WITH_OWNER_SELECT} WHERE f.owner_id = ? ORDER BY f.id ASC");
                sqlx::query_as::<_, FormWithOwnerRow>(&sql)
                    .bind(owner_id)
                    .fetch_all(executor)
                    .await?
            }
            None => {
                let sql = format!("{FORM_WITH_OWNER_SELECT} ORDER BY f.id ASC");
                sqlx::query_as::<_, FormWithOwnerRow>(&sql)
                    .fetch_all(executor)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Ghi patch của một tier action.
    ///
    /// Chỉ update các cột mà patch sở hữu, dựa trên row đang được lưu;
    /// decision của các tier khác giữ nguyên. Audit field vắng mặt giữ giá trị cũ.
    pub async fn apply_patch<'e, E>(executor: E, id: i64, patch: &StagePatch) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (decided_col, decided_at_col) = tier_columns(patch.tier);
        let sql = format!(
            r#"
            UPDATE form_submissions SET
                {decided_col} = ?,
                {decided_at_col} = ?,
                cancelled = ?,
                cancelled_reason = ?,
                last_action_done = COALESCE(?, last_action_done),
                next_step = COALESCE(?, next_step)
            WHERE id = ?
            "#
        );

        let result = sqlx::query(&sql)
            .bind(patch.decision.decided)
            .bind(patch.decision.decided_at)
            .bind(patch.cancellation.cancelled)
            .bind(&patch.cancellation.reason)
            .bind(&patch.last_action_done)
            .bind(&patch.next_step)
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("FormSubmission", id));
        }
        Ok(())
    }

    /// Đếm submissions
    pub async fn count(pool: &SqlitePool) -> PersistenceResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM form_submissions")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

/// Tên cột decision của tier
fn tier_columns(tier: Tier) -> (&'static str, &'static str) {
    match tier {
        Tier::Admin => ("admin_decided", "admin_decided_at"),
        Tier::HigherOfficial => ("higher_official_decided", "higher_official_decided_at"),
        Tier::SuperOfficial => ("super_official_decided", "super_official_decided_at"),
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Khởi tạo database connection pool (WAL, foreign keys, busy timeout)
pub async fn create_pool(database_url: &str) -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Chạy migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Tạo database mới với schema
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
