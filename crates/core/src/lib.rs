//! # Formgate Core
//!
//! Domain types cho tiered form approval:
//! - [`Tier`], [`Decision`]: ai được quyết định và quyết định gì
//! - [`FormSubmission`]: một lần nộp form cùng ba tier records
//! - [`StagePatch`]: các field mà một tier action ghi xuống
//! - [`RoleResolver`]: role gate, map token -> tier

pub mod account;
pub mod error;
pub mod form;
pub mod role;
pub mod tier;

pub use account::Account;
pub use error::{CoreError, CoreResult};
pub use form::{
    derive_state, AggregateState, AuditTrail, Cancellation, FormPayload, FormSubmission,
    StagePatch, TierAction, TierDecision,
};
pub use role::{RoleResolver, StaticTokenResolver};
pub use tier::{Decision, Tier};
