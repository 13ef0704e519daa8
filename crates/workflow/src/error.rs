//! Workflow layer errors
//!
//! Each variant maps to one caller-visible outcome; storage details stay
//! wrapped in `Persistence`.

use formgate_core::CoreError;
use formgate_persistence::PersistenceError;
use thiserror::Error;

/// Workflow operation errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    // === Lookup errors ===
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    // === Request errors ===
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // === Permission errors ===
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // === Conflict errors ===
    #[error("Phone number already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Write conflict on form {form_id} after {attempts} attempts")]
    Conflict { form_id: i64, attempts: u32 },

    // === Wrapped errors ===
    #[error("Persistence error: {0}")]
    Persistence(PersistenceError),
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl WorkflowError {
    /// Create not found error
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl From<PersistenceError> for WorkflowError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Persistence(other),
        }
    }
}

impl From<CoreError> for WorkflowError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAction(msg) => Self::InvalidAction(msg),
            CoreError::Unauthorized(msg) => Self::Unauthorized(msg),
            CoreError::ValidationError(msg) => Self::Validation(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_not_found_is_lifted() {
        let err: WorkflowError = PersistenceError::not_found("FormSubmission", 9).into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "FormSubmission not found: 9");
    }

    #[test]
    fn test_core_errors_map_to_workflow_variants() {
        let err: WorkflowError = CoreError::InvalidAction("escalate".to_string()).into();
        assert!(matches!(err, WorkflowError::InvalidAction(_)));

        let err: WorkflowError = CoreError::Unauthorized("missing role token".to_string()).into();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_conflict_display() {
        let err = WorkflowError::Conflict {
            form_id: 4,
            attempts: 4,
        };
        assert!(err.to_string().contains("form 4"));
    }
}
