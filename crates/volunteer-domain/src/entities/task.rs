//! Task entity within an Activity
//!
//! A task belongs to exactly one activity. Its completion flag is derived
//! from its status so the two can never disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::is_admin_role;
use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{ActivityId, TaskId, TaskStatus, UserId};

/// Creator identity and privilege pinned at task creation.
///
/// Permission checks read `was_admin` from here rather than from a live user
/// lookup, so a later role change does not alter who may edit the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorSnapshot {
    user_id: UserId,
    was_admin: bool,
}

impl CreatorSnapshot {
    pub fn new(user_id: UserId, was_admin: bool) -> Self {
        Self { user_id, was_admin }
    }

    /// Build from the raw `creator_role` / `creator_user_type` fields
    pub fn from_role(user_id: UserId, role: Option<i64>, user_type: Option<&str>) -> Self {
        Self {
            user_id,
            was_admin: is_admin_role(role, user_type),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn was_admin(&self) -> bool {
        self.was_admin
    }
}

/// Editable task fields, used for both creation and edits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    /// Signed so negative form input can be rejected rather than wrapped
    pub total_hours: Option<i64>,
    /// `None` keeps the current status (or the API default on creation)
    pub status: Option<TaskStatus>,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_hours(mut self, hours: i64) -> Self {
        self.total_hours = Some(hours);
        self
    }

    /// Check the draft and return the normalized title and hours
    pub fn validate(&self) -> DomainResult<(String, Option<u32>)> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title", "Task title cannot be empty"));
        }
        let hours = match self.total_hours {
            None => None,
            Some(h) if h < 0 => {
                return Err(DomainError::validation(
                    "total_hours",
                    "Total hours cannot be negative",
                ))
            }
            Some(h) => Some(u32::try_from(h).map_err(|_| {
                DomainError::validation("total_hours", "Total hours is too large")
            })?),
        };
        Ok((title.to_string(), hours))
    }
}

/// Unit of work under an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub(crate) id: TaskId,
    pub(crate) activity_id: ActivityId,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) start_date: Option<DateTime<Utc>>,
    pub(crate) due_date: Option<DateTime<Utc>>,
    pub(crate) total_hours: Option<u32>,
    pub(crate) status: TaskStatus,
    pub(crate) creator: CreatorSnapshot,
}

impl Task {
    /// Reconstitute a task from the backing API.
    ///
    /// Bypasses draft validation since the record already exists upstream.
    /// `completed_flag` is folded into the status: a task counts as completed
    /// if either the flag or the status says so.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: TaskId,
        activity_id: ActivityId,
        title: String,
        description: String,
        start_date: Option<DateTime<Utc>>,
        due_date: Option<DateTime<Utc>>,
        total_hours: Option<u32>,
        status: TaskStatus,
        completed_flag: bool,
        creator: CreatorSnapshot,
    ) -> Self {
        let status = if completed_flag {
            TaskStatus::Completed
        } else {
            status
        };
        Self {
            id,
            activity_id,
            title,
            description,
            start_date,
            due_date,
            total_hours,
            status,
            creator,
        }
    }

    /// Build a task from a validated draft
    pub fn from_draft(
        id: TaskId,
        activity_id: ActivityId,
        draft: TaskDraft,
        creator: CreatorSnapshot,
    ) -> DomainResult<Self> {
        let (title, total_hours) = draft.validate()?;
        Ok(Self {
            id,
            activity_id,
            title,
            description: draft.description,
            start_date: draft.start_date,
            due_date: draft.due_date,
            total_hours,
            status: draft.status.unwrap_or_default(),
            creator,
        })
    }

    /// Replace the editable fields; identity, owner and creator snapshot stay
    pub fn apply_draft(&mut self, draft: TaskDraft) -> DomainResult<()> {
        let (title, total_hours) = draft.validate()?;
        self.title = title;
        self.description = draft.description;
        self.start_date = draft.start_date;
        self.due_date = draft.due_date;
        self.total_hours = total_hours;
        if let Some(status) = draft.status {
            self.status = status;
        }
        Ok(())
    }

    /// Take the editable fields of a stored copy returned after a write.
    ///
    /// Identity, owning activity and creator snapshot are kept from `self`:
    /// a write reply never re-pins who authored the task.
    pub fn refresh_from(&mut self, stored: Task) {
        self.title = stored.title;
        self.description = stored.description;
        self.start_date = stored.start_date;
        self.due_date = stored.due_date;
        self.total_hours = stored.total_hours;
        self.status = stored.status;
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Current editable fields as a draft, for pre-filling edit forms
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            due_date: self.due_date,
            total_hours: self.total_hours.map(i64::from),
            status: Some(self.status),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn activity_id(&self) -> ActivityId {
        self.activity_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn total_hours(&self) -> Option<u32> {
        self.total_hours
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Always equal to `status == Completed`
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    pub fn created_by(&self) -> UserId {
        self.creator.user_id
    }

    pub fn creator(&self) -> CreatorSnapshot {
        self.creator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> CreatorSnapshot {
        CreatorSnapshot::new(UserId::new(5), false)
    }

    #[test]
    fn test_completed_flag_overrides_stale_status() {
        let task = Task::reconstitute(
            TaskId::new(1),
            ActivityId::new(1),
            "Sort donations".into(),
            String::new(),
            None,
            None,
            None,
            TaskStatus::InProgress,
            true,
            creator(),
        );
        assert_eq!(task.status(), TaskStatus::Completed);
        assert!(task.is_completed());
    }

    #[test]
    fn test_blank_title_rejected() {
        let result = Task::from_draft(
            TaskId::new(1),
            ActivityId::new(1),
            TaskDraft::titled("   "),
            creator(),
        );
        assert!(matches!(
            result,
            Err(DomainError::ValidationError { ref field, .. }) if field == "title"
        ));
    }

    #[test]
    fn test_negative_hours_rejected() {
        let draft = TaskDraft::titled("Paint fence").with_hours(-2);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_apply_draft_keeps_status_when_unset() {
        let mut task = Task::from_draft(
            TaskId::new(3),
            ActivityId::new(1),
            TaskDraft::titled("Cook").with_status(TaskStatus::InProgress),
            creator(),
        )
        .unwrap();

        task.apply_draft(TaskDraft::titled("  Cook lunch ").with_hours(3))
            .unwrap();

        assert_eq!(task.title(), "Cook lunch");
        assert_eq!(task.total_hours(), Some(3));
        assert_eq!(task.status(), TaskStatus::InProgress);
        assert_eq!(task.created_by(), UserId::new(5));
    }

    #[test]
    fn test_refresh_from_keeps_creator_snapshot() {
        let pinned = CreatorSnapshot::new(UserId::new(1), true);
        let mut task = Task::from_draft(
            TaskId::new(4),
            ActivityId::new(1),
            TaskDraft::titled("Set up tables"),
            pinned,
        )
        .unwrap();

        // reply without creator fields decodes as a non-admin author
        let echoed = Task::reconstitute(
            TaskId::new(4),
            ActivityId::new(1),
            "Set up tables".into(),
            "by the stage".into(),
            None,
            None,
            Some(2),
            TaskStatus::InProgress,
            false,
            CreatorSnapshot::from_role(UserId::new(1), None, None),
        );
        task.refresh_from(echoed);

        assert_eq!(task.status(), TaskStatus::InProgress);
        assert_eq!(task.description(), "by the stage");
        assert_eq!(task.total_hours(), Some(2));
        assert_eq!(task.creator(), pinned);
        assert!(task.creator().was_admin());
    }

    #[test]
    fn test_creator_snapshot_from_role() {
        assert!(CreatorSnapshot::from_role(UserId::new(1), Some(0), None).was_admin());
        assert!(CreatorSnapshot::from_role(UserId::new(1), None, Some("admin")).was_admin());
        assert!(!CreatorSnapshot::from_role(UserId::new(1), Some(1), Some("user")).was_admin());
    }
}
