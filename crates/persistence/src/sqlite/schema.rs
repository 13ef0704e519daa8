//! Database schema definitions
//!
//! Row types cho sqlx mapping từ SQLite tables.
//! Schema được định nghĩa trong migrations/20260301000000_init.sql

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, Utc};
use formgate_core::{
    Account, AuditTrail, Cancellation, FormPayload, FormSubmission, TierDecision,
};
use serde::{Deserialize, Serialize};

/// Row type cho bảng `accounts`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: i64,
    pub phone_number: String,
    pub user_name: String,
    #[serde(skip_serializing)]
    pub credential_hash: String,
    #[serde(skip_serializing)]
    pub credential_salt: String,
    pub created_at: DateTime<Utc>,
}

/// Dữ liệu để insert account mới (id do SQLite cấp)
#[derive(Debug, Clone)]
pub struct NewAccountRow {
    pub phone_number: String,
    pub user_name: String,
    pub credential_hash: String,
    pub credential_salt: String,
    pub created_at: DateTime<Utc>,
}

/// Row type cho bảng `form_submissions`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct FormRow {
    pub id: i64,
    pub owner_id: i64,
    pub form_type: Option<String>,
    pub form_data: String, // JSON object stored as TEXT
    pub enter_date_and_time: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub admin_decided: bool,
    pub admin_decided_at: Option<DateTime<Utc>>,
    pub higher_official_decided: bool,
    pub higher_official_decided_at: Option<DateTime<Utc>>,
    pub super_official_decided: bool,
    pub super_official_decided_at: Option<DateTime<Utc>>,
    pub cancelled: bool,
    pub cancelled_reason: Option<String>,
    pub last_action_done: Option<String>,
    pub next_step: Option<String>,
}

/// Form row kèm thông tin chủ sở hữu (JOIN accounts)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FormWithOwnerRow {
    #[sqlx(flatten)]
    pub form: FormRow,
    pub owner_phone: String,
    pub owner_name: String,
}

/// Dữ liệu để insert submission mới
#[derive(Debug, Clone)]
pub struct NewFormRow {
    pub owner_id: i64,
    pub form_type: Option<String>,
    pub payload: FormPayload,
    pub enter_date_and_time: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

// === Conversion implementations ===

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account::new(row.id, row.phone_number, row.user_name, row.created_at)
    }
}

impl FormRow {
    /// Parse form_data; payload rỗng hoặc NULL-like -> object rỗng
    pub fn payload(&self) -> PersistenceResult<FormPayload> {
        if self.form_data.trim().is_empty() {
            return Ok(FormPayload::new());
        }
        serde_json::from_str(&self.form_data).map_err(PersistenceError::from)
    }
}

impl TryFrom<FormRow> for FormSubmission {
    type Error = PersistenceError;

    fn try_from(row: FormRow) -> PersistenceResult<Self> {
        let payload = row.payload()?;
        let mut form = FormSubmission::new(row.id, row.owner_id, row.form_type, payload, row.submitted_at)
            .with_enter_date_and_time(row.enter_date_and_time);

        form.admin = TierDecision {
            decided: row.admin_decided,
            decided_at: row.admin_decided_at,
        };
        form.higher_official = TierDecision {
            decided: row.higher_official_decided,
            decided_at: row.higher_official_decided_at,
        };
        form.super_official = TierDecision {
            decided: row.super_official_decided,
            decided_at: row.super_official_decided_at,
        };
        form.cancellation = Cancellation {
            cancelled: row.cancelled,
            reason: row.cancelled_reason,
        };
        form.audit = AuditTrail {
            last_action_done: row.last_action_done,
            next_step: row.next_step,
        };
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgate_core::AggregateState;

    fn row(form_data: &str) -> FormRow {
        FormRow {
            id: 1,
            owner_id: 2,
            form_type: Some("land".to_string()),
            form_data: form_data.to_string(),
            enter_date_and_time: None,
            submitted_at: Utc::now(),
            admin_decided: true,
            admin_decided_at: Some(Utc::now()),
            higher_official_decided: true,
            higher_official_decided_at: Some(Utc::now()),
            super_official_decided: false,
            super_official_decided_at: None,
            cancelled: true,
            cancelled_reason: Some("boundary dispute".to_string()),
            last_action_done: None,
            next_step: None,
        }
    }

    #[test]
    fn test_row_to_submission_keeps_payload_order() {
        let form = FormSubmission::try_from(row(r#"{"zeta":1,"alpha":{"x":[1,2]},"mid":"m"}"#))
            .unwrap();
        let keys: Vec<_> = form.payload.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(form.state(), AggregateState::Cancelled);
        assert_eq!(form.cancellation.reason.as_deref(), Some("boundary dispute"));
    }

    #[test]
    fn test_empty_form_data_is_empty_payload() {
        let form = FormSubmission::try_from(row("")).unwrap();
        assert!(form.payload.is_empty());
    }

    #[test]
    fn test_non_object_form_data_is_error() {
        let err = FormSubmission::try_from(row("[1,2,3]")).unwrap_err();
        assert!(matches!(err, PersistenceError::PayloadSerialization(_)));
    }
}
