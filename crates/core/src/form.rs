//! # Form Module
//!
//! FormSubmission và approval state machine.
//!
//! Mỗi submission có ba tier records, một cancellation record dùng chung và
//! hai audit fields. Trạng thái tổng (`AggregateState`) luôn được tính lại từ
//! các field này, không bao giờ lưu riêng.

use crate::tier::{Decision, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Payload do công dân gửi lên, giữ nguyên thứ tự key, không bao giờ được diễn giải.
pub type FormPayload = Map<String, Value>;

/// Trạng thái tổng của một form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateState {
    /// Chưa đủ ba tier approve và không bị cancel
    Pending,
    /// Cả ba tier đã approve
    Approved,
    /// Cancellation flag đang bật
    Cancelled,
}

impl AggregateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateState::Pending => "pending",
            AggregateState::Approved => "approved",
            AggregateState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AggregateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quyết định gần nhất của một tier.
///
/// `decided` chỉ true khi hành động gần nhất là approve;
/// `decided_at` được set ở hành động đầu tiên và không bao giờ bị xóa.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDecision {
    pub decided: bool,
    pub decided_at: Option<DateTime<Utc>>,
}

impl TierDecision {
    /// Tier đã từng hành động hay chưa
    pub fn has_acted(&self) -> bool {
        self.decided_at.is_some()
    }
}

/// Cancellation record dùng chung cho cả ba tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    pub cancelled: bool,
    pub reason: Option<String>,
}

impl Cancellation {
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            cancelled: true,
            reason: Some(reason.into()),
        }
    }
}

/// Audit fields, bị ghi đè bởi tier hành động gần nhất.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrail {
    pub last_action_done: Option<String>,
    pub next_step: Option<String>,
}

/// Một lần nộp form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub id: i64,
    pub owner_id: i64,
    /// Loại form (tag tự do)
    pub form_type: Option<String>,
    pub payload: FormPayload,
    /// Ngày giờ do công dân nhập, lưu nguyên văn
    pub enter_date_and_time: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub admin: TierDecision,
    pub higher_official: TierDecision,
    pub super_official: TierDecision,
    pub cancellation: Cancellation,
    pub audit: AuditTrail,
}

impl FormSubmission {
    /// Tạo submission mới: chưa tier nào quyết định, chưa cancel, chưa có audit text
    pub fn new(
        id: i64,
        owner_id: i64,
        form_type: Option<String>,
        payload: FormPayload,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            form_type,
            payload,
            enter_date_and_time: None,
            submitted_at,
            admin: TierDecision::default(),
            higher_official: TierDecision::default(),
            super_official: TierDecision::default(),
            cancellation: Cancellation::default(),
            audit: AuditTrail::default(),
        }
    }

    pub fn with_enter_date_and_time(mut self, entered: Option<String>) -> Self {
        self.enter_date_and_time = entered;
        self
    }

    /// Lấy decision record của tier
    pub fn tier(&self, tier: Tier) -> &TierDecision {
        match tier {
            Tier::Admin => &self.admin,
            Tier::HigherOfficial => &self.higher_official,
            Tier::SuperOfficial => &self.super_official,
        }
    }

    /// Trạng thái tổng, tính lại mỗi lần gọi
    pub fn state(&self) -> AggregateState {
        derive_state(
            self.cancellation.cancelled,
            [
                self.admin.decided,
                self.higher_official.decided,
                self.super_official.decided,
            ],
        )
    }
}

/// Quy tắc trạng thái tổng: cancelled thắng, sau đó approved nếu đủ ba tier.
pub fn derive_state(cancelled: bool, decided: [bool; 3]) -> AggregateState {
    if cancelled {
        AggregateState::Cancelled
    } else if decided.iter().all(|d| *d) {
        AggregateState::Approved
    } else {
        AggregateState::Pending
    }
}

/// Yêu cầu hành động của một tier trên form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierAction {
    pub tier: Tier,
    pub decision: Decision,
    pub reason: Option<String>,
    pub last_action_done: Option<String>,
    pub next_step: Option<String>,
}

impl TierAction {
    pub fn new(tier: Tier, decision: Decision) -> Self {
        Self {
            tier,
            decision,
            reason: None,
            last_action_done: None,
            next_step: None,
        }
    }

    pub fn approve(tier: Tier) -> Self {
        Self::new(tier, Decision::Approve)
    }

    pub fn cancel(tier: Tier) -> Self {
        Self::new(tier, Decision::Cancel)
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    pub fn with_last_action(mut self, last_action_done: Option<String>) -> Self {
        self.last_action_done = last_action_done;
        self
    }

    pub fn with_next_step(mut self, next_step: Option<String>) -> Self {
        self.next_step = next_step;
        self
    }
}

/// Tập field mà một tier action ghi xuống storage.
///
/// Patch chỉ chứa decision record của tier đang hành động, cancellation record
/// dùng chung và các audit field có mặt trong request. Các tier khác không bị chạm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePatch {
    pub tier: Tier,
    pub decision: TierDecision,
    pub cancellation: Cancellation,
    pub last_action_done: Option<String>,
    pub next_step: Option<String>,
}

impl StagePatch {
    pub fn for_action(action: &TierAction, at: DateTime<Utc>) -> Self {
        let (decided, cancellation) = match action.decision {
            Decision::Approve => (true, Cancellation::cleared()),
            Decision::Cancel => {
                // Blank reason -> tier default; otherwise stored as given
                let reason = action
                    .reason
                    .as_deref()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| action.tier.default_cancel_reason());
                (false, Cancellation::with_reason(reason))
            }
        };

        Self {
            tier: action.tier,
            decision: TierDecision {
                decided,
                decided_at: Some(at),
            },
            cancellation,
            last_action_done: action.last_action_done.clone(),
            next_step: action.next_step.clone(),
        }
    }
}

/// In-memory replay of tier actions, mirroring what `FormRepo::apply_patch` writes
#[cfg(test)]
impl FormSubmission {
    fn tier_mut(&mut self, tier: Tier) -> &mut TierDecision {
        match tier {
            Tier::Admin => &mut self.admin,
            Tier::HigherOfficial => &mut self.higher_official,
            Tier::SuperOfficial => &mut self.super_official,
        }
    }

    fn apply(&mut self, action: &TierAction, at: DateTime<Utc>) -> AggregateState {
        let patch = StagePatch::for_action(action, at);
        self.apply_patch(&patch);
        self.state()
    }

    fn apply_patch(&mut self, patch: &StagePatch) {
        *self.tier_mut(patch.tier) = patch.decision.clone();
        self.cancellation = patch.cancellation.clone();
        if let Some(last) = &patch.last_action_done {
            self.audit.last_action_done = Some(last.clone());
        }
        if let Some(next) = &patch.next_step {
            self.audit.next_step = Some(next.clone());
        }
    }
}
