//! Shared context for workflow services
//!
//! Holds database access, the role gate and retry policy. Services borrow
//! the context for the duration of one operation.

use crate::error::{WorkflowError, WorkflowResult};
use formgate_core::{RoleResolver, Tier};
use formgate_persistence::Database;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

/// Retry policy for transient storage failures
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Retries after the first attempt before surfacing `Conflict`
    pub max_retries: u32,
    /// Base delay, multiplied by the attempt number
    pub retry_backoff: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff: Duration::from_millis(20),
        }
    }
}

/// Context for workflow operations - contains database access and role gate
pub struct WorkflowContext {
    db: Database,
    roles: Arc<dyn RoleResolver>,
    config: WorkflowConfig,
}

impl WorkflowContext {
    /// Create new context with the default retry policy
    pub fn new(db: Database, roles: Arc<dyn RoleResolver>) -> Self {
        Self::with_config(db, roles, WorkflowConfig::default())
    }

    pub fn with_config(db: Database, roles: Arc<dyn RoleResolver>, config: WorkflowConfig) -> Self {
        Self { db, roles, config }
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Resolve the caller's tier from a request token
    pub fn resolve_role(&self, token: Option<&str>) -> WorkflowResult<Tier> {
        self.roles.resolve_role(token).map_err(WorkflowError::from)
    }
}
