//! Read projections returned to callers
//!
//! Every projection recomputes the aggregate state from the stored fields.

use chrono::{DateTime, Utc};
use formgate_core::{
    AggregateState, Cancellation, Decision, FormPayload, FormSubmission, Tier, TierDecision,
};
use formgate_persistence::{FormWithOwnerRow, PersistenceResult};
use serde::Serialize;

/// Full field projection of one form submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub id: i64,
    pub owner_id: i64,
    pub owner_phone: String,
    pub owner_name: String,
    pub form_type: Option<String>,
    pub form_data: FormPayload,
    pub enter_date_and_time: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub state: AggregateState,
    pub admin: TierDecision,
    pub higher_official: TierDecision,
    pub super_official: TierDecision,
    pub cancellation: Cancellation,
    pub last_action_done: Option<String>,
    pub next_step: Option<String>,
}

impl FormView {
    pub fn from_submission(form: FormSubmission, owner_phone: String, owner_name: String) -> Self {
        Self {
            state: form.state(),
            id: form.id,
            owner_id: form.owner_id,
            owner_phone,
            owner_name,
            form_type: form.form_type,
            form_data: form.payload,
            enter_date_and_time: form.enter_date_and_time,
            submitted_at: form.submitted_at,
            admin: form.admin,
            higher_official: form.higher_official,
            super_official: form.super_official,
            cancellation: form.cancellation,
            last_action_done: form.audit.last_action_done,
            next_step: form.audit.next_step,
        }
    }

    pub fn tier(&self, tier: Tier) -> &TierDecision {
        match tier {
            Tier::Admin => &self.admin,
            Tier::HigherOfficial => &self.higher_official,
            Tier::SuperOfficial => &self.super_official,
        }
    }
}

impl TryFrom<FormWithOwnerRow> for FormView {
    type Error = formgate_persistence::PersistenceError;

    fn try_from(row: FormWithOwnerRow) -> PersistenceResult<Self> {
        let form = FormSubmission::try_from(row.form)?;
        Ok(Self::from_submission(form, row.owner_phone, row.owner_name))
    }
}

/// Number of forms in each aggregate state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub pending: usize,
    pub approved: usize,
    pub cancelled: usize,
}

impl StateCounts {
    pub fn tally<'a>(states: impl IntoIterator<Item = &'a AggregateState>) -> Self {
        let mut counts = Self::default();
        for state in states {
            match state {
                AggregateState::Pending => counts.pending += 1,
                AggregateState::Approved => counts.approved += 1,
                AggregateState::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.pending + self.approved + self.cancelled
    }
}

/// Dashboard summary: counts plus every form in creation order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSummary {
    pub counts: StateCounts,
    pub forms: Vec<FormView>,
}

impl FormSummary {
    pub fn from_views(forms: Vec<FormView>) -> Self {
        let counts = StateCounts::tally(forms.iter().map(|f| &f.state));
        Self { counts, forms }
    }
}

/// Result of one tier action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierActionOutcome {
    pub form_id: i64,
    pub tier: Tier,
    pub decision: Decision,
    pub state: AggregateState,
    pub form: FormView,
}
