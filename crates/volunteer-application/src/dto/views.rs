//! Read models for UI callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use volunteer_domain::entities::{Actor, Task};
use volunteer_domain::services::{ActivityPermissions, PermissionPolicy, TaskPermissions};
use volunteer_domain::value_objects::{ActivityId, ActivityStatus, Progress, TaskId, TaskStatus, UserId};

/// Task row with the viewer's rights on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub total_hours: Option<u32>,
    pub created_by: UserId,
    pub assignees: Vec<UserId>,
    pub permissions: TaskPermissions,
}

impl TaskView {
    pub fn from_domain(task: &Task, assignees: Vec<UserId>, actor: &Actor) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            status: task.status(),
            completed: task.is_completed(),
            due_date: task.due_date(),
            total_hours: task.total_hours(),
            created_by: task.created_by(),
            assignees,
            permissions: PermissionPolicy::for_task(actor, task),
        }
    }
}

/// Activity detail as the viewer sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityView {
    pub id: ActivityId,
    pub title: String,
    pub organization_name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: ActivityStatus,
    pub progress: Progress,
    pub progress_overridden: bool,
    pub is_public: bool,
    pub is_joined: bool,
    pub participant_count: u32,
    pub max_participants: Option<u32>,
    pub permissions: ActivityPermissions,
    pub tasks: Vec<TaskView>,
}
