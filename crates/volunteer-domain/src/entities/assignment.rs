//! Task/user assignment

use serde::{Deserialize, Serialize};

use crate::value_objects::{AssignmentStatus, TaskId, UserId};

/// Association between a task and the user performing it.
///
/// `(task_id, user_id)` is unique; the status is carried through but not
/// interpreted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub status: AssignmentStatus,
}

impl Assignment {
    pub fn new(task_id: TaskId, user_id: UserId) -> Self {
        Self {
            task_id,
            user_id,
            status: AssignmentStatus::Assigned,
        }
    }

    pub fn with_status(mut self, status: AssignmentStatus) -> Self {
        self.status = status;
        self
    }
}
