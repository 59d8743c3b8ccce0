//! Best-effort execution of an assignment diff
//!
//! The collaborator has no transactions, so each add/remove is issued on its
//! own. A failed pair is logged and recorded; the remaining pairs still run.

use tracing::{debug, warn};

use volunteer_domain::services::AssignmentDiff;
use volunteer_domain::value_objects::{TaskId, UserId};

use crate::errors::{AssignmentOp, PairFailure};
use crate::ports::AssignmentRepository;

/// What actually landed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub added: Vec<UserId>,
    pub removed: Vec<UserId>,
    pub failures: Vec<PairFailure>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct AssignmentBatch<'a, R: AssignmentRepository + ?Sized> {
    repository: &'a R,
}

impl<'a, R: AssignmentRepository + ?Sized> AssignmentBatch<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Issue every add, then every remove
    pub async fn execute(&self, task_id: TaskId, diff: &AssignmentDiff) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for &user_id in &diff.to_add {
            match self.repository.add_assignment(task_id, user_id).await {
                Ok(()) => outcome.added.push(user_id),
                Err(err) => {
                    warn!(task_id = %task_id, user_id = %user_id, error = %err, "Failed to add assignment");
                    outcome.failures.push(PairFailure {
                        task_id,
                        user_id,
                        op: AssignmentOp::Add,
                        reason: err.to_string(),
                    });
                }
            }
        }

        for &user_id in &diff.to_remove {
            match self.repository.remove_assignment(task_id, user_id).await {
                Ok(()) => outcome.removed.push(user_id),
                Err(err) => {
                    warn!(task_id = %task_id, user_id = %user_id, error = %err, "Failed to remove assignment");
                    outcome.failures.push(PairFailure {
                        task_id,
                        user_id,
                        op: AssignmentOp::Remove,
                        reason: err.to_string(),
                    });
                }
            }
        }

        debug!(
            task_id = %task_id,
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            failed = outcome.failures.len(),
            "Assignment batch finished"
        );
        outcome
    }
}
