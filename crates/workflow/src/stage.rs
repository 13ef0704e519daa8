//! Stage Action Processor - one tier's approve/cancel on one form
//!
//! Each attempt runs in its own transaction: the tier's patch is merged into
//! the stored row (only the columns the patch owns), then the row is read back
//! to compute the aggregate state. Two tiers acting on the same form therefore
//! serialize on the row and neither loses its own decision fields; the shared
//! cancellation record keeps whichever commit lands last.

use crate::context::WorkflowContext;
use crate::error::{WorkflowError, WorkflowResult};
use crate::view::{FormView, TierActionOutcome};
use chrono::Utc;
use formgate_core::{Decision, StagePatch, Tier, TierAction};
use formgate_persistence::{FormRepo, FormWithOwnerRow, PersistenceError, PersistenceResult};
use tracing::{debug, info, warn};

/// Tier action as received from a caller, before validation
#[derive(Debug, Clone, Default)]
pub struct TierActionRequest {
    pub decision: Option<String>,
    pub reason: Option<String>,
    pub last_action_done: Option<String>,
    pub next_step: Option<String>,
}

impl TierActionRequest {
    pub fn new(decision: impl Into<String>) -> Self {
        Self {
            decision: Some(decision.into()),
            ..Self::default()
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_last_action(mut self, last_action_done: impl Into<String>) -> Self {
        self.last_action_done = Some(last_action_done.into());
        self
    }

    pub fn with_next_step(mut self, next_step: impl Into<String>) -> Self {
        self.next_step = Some(next_step.into());
        self
    }

    /// Validate the decision and bind the request to a tier
    pub fn into_action(self, tier: Tier) -> WorkflowResult<TierAction> {
        let decision = Decision::parse(self.decision.as_deref())?;
        Ok(TierAction::new(tier, decision)
            .with_reason(self.reason)
            .with_last_action(self.last_action_done)
            .with_next_step(self.next_step))
    }
}

/// Applies tier decisions to stored forms
pub struct StageActionProcessor<'a> {
    ctx: &'a WorkflowContext,
}

impl<'a> StageActionProcessor<'a> {
    pub fn new(ctx: &'a WorkflowContext) -> Self {
        Self { ctx }
    }

    /// Resolve the caller's tier from `token`, then apply the action as that tier.
    ///
    /// Role resolution happens before anything touches storage.
    pub async fn act_with_token(
        &self,
        token: Option<&str>,
        form_id: i64,
        request: TierActionRequest,
    ) -> WorkflowResult<TierActionOutcome> {
        let tier = self.ctx.resolve_role(token)?;
        self.apply_tier_action(form_id, tier, request).await
    }

    /// Apply one tier's decision to one form.
    ///
    /// Invalid or missing decisions fail before any storage access.
    pub async fn apply_tier_action(
        &self,
        form_id: i64,
        tier: Tier,
        request: TierActionRequest,
    ) -> WorkflowResult<TierActionOutcome> {
        let action = request.into_action(tier)?;
        let max_attempts = self.ctx.config().max_retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let patch = StagePatch::for_action(&action, Utc::now());

            match self.commit_patch(form_id, &patch).await {
                Ok(row) => {
                    let form = FormView::try_from(row)?;
                    info!(
                        form_id,
                        tier = %tier,
                        decision = %action.decision,
                        state = %form.state,
                        "tier action applied"
                    );
                    return Ok(TierActionOutcome {
                        form_id,
                        tier,
                        decision: action.decision,
                        state: form.state,
                        form,
                    });
                }
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    warn!(form_id, tier = %tier, attempt, error = %err, "transient write failure, retrying");
                    tokio::time::sleep(self.ctx.config().retry_backoff * attempt).await;
                }
                Err(err) if err.is_transient() => {
                    warn!(form_id, tier = %tier, attempts = attempt, "giving up after repeated write failures");
                    return Err(WorkflowError::Conflict {
                        form_id,
                        attempts: attempt,
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// One transactional attempt: merge the patch, read the row back, commit
    async fn commit_patch(&self, form_id: i64, patch: &StagePatch) -> PersistenceResult<FormWithOwnerRow> {
        let mut tx = self.ctx.pool().begin().await.map_err(PersistenceError::from)?;

        FormRepo::apply_patch(&mut *tx, form_id, patch).await?;
        let row = FormRepo::get_with_owner(&mut *tx, form_id).await?;

        tx.commit().await.map_err(PersistenceError::from)?;
        debug!(form_id, tier = %patch.tier, "stage patch committed");
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_into_action() {
        let action = TierActionRequest::new("Finalized")
            .with_last_action("verified")
            .into_action(Tier::HigherOfficial)
            .unwrap();
        assert_eq!(action.decision, Decision::Approve);
        assert_eq!(action.tier, Tier::HigherOfficial);
        assert_eq!(action.last_action_done.as_deref(), Some("verified"));
        assert_eq!(action.next_step, None);
    }

    #[test]
    fn test_request_without_decision_is_invalid() {
        let err = TierActionRequest::default()
            .into_action(Tier::Admin)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidAction(_)));
    }
}
