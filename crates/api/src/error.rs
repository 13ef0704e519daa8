//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use formgate_workflow::WorkflowError;
use tracing::error;

use crate::handlers::ApiResponse;

/// Workflow error carried to the HTTP edge
#[derive(Debug)]
pub struct ApiError(pub WorkflowError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            WorkflowError::NotFound { .. } => StatusCode::NOT_FOUND,
            WorkflowError::InvalidAction(_) | WorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
            WorkflowError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            WorkflowError::AlreadyRegistered(_) | WorkflowError::Conflict { .. } => StatusCode::CONFLICT,
            WorkflowError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, ApiResponse::<()>::error(message)).into_response()
    }
}
