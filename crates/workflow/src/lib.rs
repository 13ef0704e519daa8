//! # Formgate Workflow
//!
//! Workflow layer - submissions, tier actions, dashboard summaries.
//!
//! ```text
//! submit ──> FormService ──> form_submissions
//!                                  ▲
//! tier action ──> StageActionProcessor (tx: patch, read back)
//!                                  │
//! dashboards ──> SummaryService ───┘ (read-only snapshot)
//! ```

pub mod account;
pub mod context;
pub mod credential;
pub mod error;
pub mod form;
pub mod stage;
pub mod summary;
pub mod view;

pub use account::AccountService;
pub use context::{WorkflowConfig, WorkflowContext};
pub use error::{WorkflowError, WorkflowResult};
pub use form::{FormService, NewSubmission};
pub use stage::{StageActionProcessor, TierActionRequest};
pub use summary::{SummaryScope, SummaryService};
pub use view::{FormSummary, FormView, StateCounts, TierActionOutcome};
