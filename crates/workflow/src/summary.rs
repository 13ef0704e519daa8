//! Aggregate View Builder - dashboard summaries
//!
//! Counts are recomputed from stored fields on every call. Each summary is
//! one read transaction, so it reflects a single snapshot of committed state.

use crate::context::WorkflowContext;
use crate::error::{WorkflowError, WorkflowResult};
use crate::form::persistence;
use crate::view::{FormSummary, FormView};
use formgate_persistence::{AccountRepo, FormRepo};
use tracing::debug;

/// Which forms a summary covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryScope {
    All,
    Owner(i64),
    OwnerPhone(String),
}

/// Builds read-only summaries for dashboards
pub struct SummaryService<'a> {
    ctx: &'a WorkflowContext,
}

impl<'a> SummaryService<'a> {
    pub fn new(ctx: &'a WorkflowContext) -> Self {
        Self { ctx }
    }

    pub async fn summarize(&self, scope: SummaryScope) -> WorkflowResult<FormSummary> {
        let mut tx = self.ctx.pool().begin().await.map_err(persistence)?;

        let owner_id = match &scope {
            SummaryScope::All => None,
            SummaryScope::Owner(id) => {
                if !AccountRepo::exists(&mut *tx, *id).await? {
                    return Err(WorkflowError::not_found("Account", id));
                }
                Some(*id)
            }
            SummaryScope::OwnerPhone(phone) => {
                Some(AccountRepo::get_by_phone(&mut *tx, phone.trim()).await?.id)
            }
        };

        let rows = FormRepo::list_with_owner(&mut *tx, owner_id).await?;
        tx.commit().await.map_err(persistence)?;

        let forms = rows
            .into_iter()
            .map(FormView::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let summary = FormSummary::from_views(forms);

        debug!(
            ?scope,
            pending = summary.counts.pending,
            approved = summary.counts.approved,
            cancelled = summary.counts.cancelled,
            "summary built"
        );
        Ok(summary)
    }

    pub async fn all(&self) -> WorkflowResult<FormSummary> {
        self.summarize(SummaryScope::All).await
    }

    /// All-forms summary for a tier dashboard; the token must resolve to a tier
    pub async fn dashboard(&self, token: Option<&str>) -> WorkflowResult<FormSummary> {
        let tier = self.ctx.resolve_role(token)?;
        debug!(tier = %tier, "dashboard requested");
        self.all().await
    }
}
