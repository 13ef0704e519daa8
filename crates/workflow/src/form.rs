//! Form submission operations - submit, get, list by owner
//!
//! Every submission is a new record; resubmitting the same category never
//! updates an earlier one.

use crate::context::WorkflowContext;
use crate::error::{WorkflowError, WorkflowResult};
use crate::view::FormView;
use chrono::Utc;
use formgate_core::{FormPayload, FormSubmission};
use formgate_persistence::{AccountRepo, FormRepo, NewFormRow};
use tracing::info;

/// Input for a new submission
#[derive(Debug, Clone, Default)]
pub struct NewSubmission {
    pub form_type: Option<String>,
    pub payload: FormPayload,
    pub enter_date_and_time: Option<String>,
}

impl NewSubmission {
    pub fn new(form_type: Option<String>, payload: FormPayload) -> Self {
        Self {
            form_type,
            payload,
            enter_date_and_time: None,
        }
    }

    pub fn with_enter_date_and_time(mut self, entered: Option<String>) -> Self {
        self.enter_date_and_time = entered;
        self
    }
}

/// Form Service - the Form Store operations
pub struct FormService<'a> {
    ctx: &'a WorkflowContext,
}

impl<'a> FormService<'a> {
    pub fn new(ctx: &'a WorkflowContext) -> Self {
        Self { ctx }
    }

    /// Create a submission for an existing owner
    pub async fn submit(&self, owner_id: i64, submission: NewSubmission) -> WorkflowResult<FormSubmission> {
        let row = NewFormRow {
            owner_id,
            form_type: submission.form_type,
            payload: submission.payload,
            enter_date_and_time: submission.enter_date_and_time,
            submitted_at: Utc::now(),
        };

        let created = FormRepo::create(self.ctx.pool(), &row).await?;
        info!(form_id = created.id, owner_id, "form submitted");

        Ok(FormSubmission::try_from(created)?)
    }

    /// Create a submission for the account registered under `phone_number`
    pub async fn submit_by_phone(
        &self,
        phone_number: &str,
        submission: NewSubmission,
    ) -> WorkflowResult<FormSubmission> {
        let owner = AccountRepo::get_by_phone(self.ctx.pool(), phone_number.trim()).await?;
        self.submit(owner.id, submission).await
    }

    /// Get one submission as a full projection
    pub async fn get(&self, form_id: i64) -> WorkflowResult<FormView> {
        let row = FormRepo::get_with_owner(self.ctx.pool(), form_id).await?;
        Ok(FormView::try_from(row)?)
    }

    /// Owner's submissions in creation order
    pub async fn list_by_owner(&self, owner_id: i64) -> WorkflowResult<Vec<FormSubmission>> {
        let mut tx = self.ctx.pool().begin().await.map_err(persistence)?;

        if !AccountRepo::exists(&mut *tx, owner_id).await? {
            return Err(WorkflowError::not_found("Account", owner_id));
        }
        let rows = FormRepo::list_by_owner(&mut *tx, owner_id).await?;
        tx.commit().await.map_err(persistence)?;

        rows.into_iter()
            .map(|row| FormSubmission::try_from(row).map_err(WorkflowError::from))
            .collect()
    }
}

/// Lift a raw sqlx error through the persistence error type
pub(crate) fn persistence(err: sqlx::Error) -> WorkflowError {
    formgate_persistence::PersistenceError::from(err).into()
}
