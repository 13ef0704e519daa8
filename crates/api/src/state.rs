//! Application state

use formgate_workflow::WorkflowContext;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<WorkflowContext>,
}

impl AppState {
    pub fn new(ctx: WorkflowContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }
}
