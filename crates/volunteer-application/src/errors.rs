//! Application layer error types
//!
//! These errors are what UI callers see. Each failure class of the engine
//! maps to its own variant so callers can react without parsing messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use volunteer_domain::errors::DomainError;
use volunteer_domain::value_objects::{TaskId, UserId};

/// Application layer result type
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Direction of a single assignment change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentOp {
    Add,
    Remove,
}

impl std::fmt::Display for AssignmentOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentOp::Add => write!(f, "add"),
            AssignmentOp::Remove => write!(f, "remove"),
        }
    }
}

/// One add/remove that the collaborator rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFailure {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub op: AssignmentOp,
    pub reason: String,
}

/// Application layer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    // === Validation Errors ===

    /// Input rejected before any network call
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    // === Permission Errors ===

    /// The actor may not perform this action
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    // === Not Found Errors ===

    /// Entity is gone; callers should reload the parent list
    #[error("Not found: {0}")]
    NotFound(String),

    // === Business Rule Violations ===

    /// Operation not allowed in the current state
    #[error("Operation not allowed: {0}")]
    OperationNotAllowed(String),

    // === Infrastructure Errors ===

    /// Some assignment changes failed; the others were applied.
    /// The assignee cache was refreshed from the collaborator afterwards.
    #[error("{} assignment change(s) failed for task {task_id}", .failures.len())]
    PartialBatchFailure {
        task_id: TaskId,
        failures: Vec<PairFailure>,
    },

    /// Network or collaborator unavailable; never retried automatically
    #[error("Network failure: {0}")]
    TransientNetwork(String),
}

impl ApplicationError {
    /// Short message suitable for showing to the actor
    pub fn user_message(&self) -> String {
        match self {
            ApplicationError::ValidationFailed(msg) => msg.clone(),
            ApplicationError::PermissionDenied(_) => {
                "You do not have permission to do that.".to_string()
            }
            ApplicationError::NotFound(_) => {
                "This item no longer exists. Please reload.".to_string()
            }
            ApplicationError::OperationNotAllowed(msg) => msg.clone(),
            ApplicationError::PartialBatchFailure { failures, .. } => format!(
                "{} assignment change(s) could not be saved. The list shows the current assignees.",
                failures.len()
            ),
            ApplicationError::TransientNetwork(_) => {
                "Network error. Please try again.".to_string()
            }
        }
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError { field, reason } => {
                ApplicationError::ValidationFailed(format!("{}: {}", field, reason))
            }
            DomainError::BusinessRuleViolation { rule } => ApplicationError::OperationNotAllowed(rule),
            DomainError::EntityNotFound { entity_type, id } => {
                ApplicationError::NotFound(format!("{} {}", entity_type, id))
            }
            DomainError::AccessDenied { resource } => ApplicationError::PermissionDenied(resource),
            DomainError::CollaboratorUnavailable { reason } => {
                ApplicationError::TransientNetwork(reason)
            }
        }
    }
}
