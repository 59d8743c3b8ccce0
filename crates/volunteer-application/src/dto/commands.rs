//! Use-case commands

use serde::{Deserialize, Serialize};

use volunteer_domain::entities::TaskDraft;
use volunteer_domain::value_objects::UserId;

/// Create a task, optionally assigning users straight away
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskCommand {
    pub task: TaskDraft,
    #[serde(default)]
    pub assignees: Vec<UserId>,
}

impl CreateTaskCommand {
    pub fn new(task: TaskDraft) -> Self {
        Self {
            task,
            assignees: Vec::new(),
        }
    }

    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = UserId>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }
}

/// Edit a task. `assignees: None` leaves the assignment list untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditTaskCommand {
    pub task: TaskDraft,
    #[serde(default)]
    pub assignees: Option<Vec<UserId>>,
}

impl EditTaskCommand {
    pub fn new(task: TaskDraft) -> Self {
        Self {
            task,
            assignees: None,
        }
    }

    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = UserId>) -> Self {
        self.assignees = Some(assignees.into_iter().collect());
        self
    }
}
