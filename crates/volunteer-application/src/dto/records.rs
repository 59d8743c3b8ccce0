//! Wire records exchanged with the backing API
//!
//! Field names follow the API (snake_case). Conversions into domain
//! entities are lenient: malformed dates are treated as absent and logged,
//! unknown statuses fall back to the API defaults.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use volunteer_domain::entities::{
    is_admin_role, Activity, Assignment, CreatorSnapshot, Participant, Task, TaskDraft,
    UserSummary,
};
use volunteer_domain::services::parse_instant;
use volunteer_domain::value_objects::{
    ActivityId, AssignmentStatus, TaskId, TaskStatus, UserId,
};

fn lenient_date(raw: Option<&str>, field: &'static str, owner: &str) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = parse_instant(raw);
    if parsed.is_none() {
        warn!(field, owner, value = raw, "Ignoring malformed date");
    }
    parsed
}

fn format_date(date: Option<DateTime<Utc>>) -> Option<String> {
    date.map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Roster entry inside an activity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    #[serde(alias = "id")]
    pub user_id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl From<ParticipantRecord> for Participant {
    fn from(record: ParticipantRecord) -> Self {
        Participant {
            user_id: record.user_id,
            name: record.name,
            email: record.email,
        }
    }
}

/// Activity as served by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: ActivityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub created_by: UserId,
    #[serde(default)]
    pub participant_count: Option<u32>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub participants: Vec<ParticipantRecord>,
}

impl ActivityRecord {
    pub fn into_domain(self) -> Activity {
        let owner = format!("activity {}", self.id);
        let start = lenient_date(self.start_date.as_deref(), "start_date", &owner);
        let end = lenient_date(self.end_date.as_deref(), "end_date", &owner);
        let reported = self.participant_count.unwrap_or(0);
        let participants = self.participants.into_iter().map(Participant::from).collect();

        Activity::new(self.id, self.title, self.created_by)
            .with_details(
                self.description.unwrap_or_default(),
                self.category.unwrap_or_default(),
                self.organization_name.unwrap_or_default(),
                self.location.unwrap_or_default(),
            )
            .with_window(start, end)
            .with_visibility(self.is_public)
            .with_capacity(self.max_participants)
            .with_participants(participants, reported)
    }
}

/// Task as served by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub activity_id: ActivityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub total_hours: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    pub created_by: UserId,
    #[serde(default)]
    pub creator_role: Option<i64>,
    #[serde(default)]
    pub creator_user_type: Option<String>,
}

impl TaskRecord {
    pub fn into_domain(self) -> Task {
        let owner = format!("task {}", self.id);
        let start = lenient_date(self.start_date.as_deref(), "start_date", &owner);
        let due = lenient_date(self.due_date.as_deref(), "due_date", &owner);
        let hours = match self.total_hours {
            Some(h) if h < 0 => {
                warn!(task = %self.id, total_hours = h, "Ignoring negative total hours");
                None
            }
            Some(h) => u32::try_from(h).ok(),
            None => None,
        };
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::parse_lenient)
            .unwrap_or_default();
        let creator = CreatorSnapshot::from_role(
            self.created_by,
            self.creator_role,
            self.creator_user_type.as_deref(),
        );

        Task::reconstitute(
            self.id,
            self.activity_id,
            self.title,
            self.description.unwrap_or_default(),
            start,
            due,
            hours,
            status,
            self.completed.unwrap_or(false),
            creator,
        )
    }

    /// Record for a task write. `completed` always mirrors the status.
    pub fn from_domain(task: &Task) -> Self {
        let creator = task.creator();
        Self {
            id: task.id(),
            activity_id: task.activity_id(),
            title: task.title().to_string(),
            description: Some(task.description().to_string()),
            start_date: format_date(task.start_date()),
            due_date: format_date(task.due_date()),
            total_hours: task.total_hours().map(i64::from),
            status: Some(task.status().as_str().to_string()),
            completed: Some(task.is_completed()),
            created_by: creator.user_id(),
            creator_role: creator_role_code(creator),
            creator_user_type: Some(creator_user_type(creator).to_string()),
        }
    }
}

/// Body of a task creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTaskRecord {
    pub activity_id: ActivityId,
    pub title: String,
    pub description: String,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub total_hours: Option<i64>,
    pub status: String,
    pub completed: bool,
    pub created_by: UserId,
    pub creator_role: Option<i64>,
    pub creator_user_type: String,
}

impl NewTaskRecord {
    /// Build from a draft; callers validate the draft first
    pub fn from_draft(activity_id: ActivityId, draft: &TaskDraft, creator: CreatorSnapshot) -> Self {
        let status = draft.status.unwrap_or_default();
        Self {
            activity_id,
            title: draft.title.trim().to_string(),
            description: draft.description.clone(),
            start_date: format_date(draft.start_date),
            due_date: format_date(draft.due_date),
            total_hours: draft.total_hours,
            status: status.as_str().to_string(),
            completed: status.is_completed(),
            created_by: creator.user_id(),
            creator_role: creator_role_code(creator),
            creator_user_type: creator_user_type(creator).to_string(),
        }
    }
}

fn creator_role_code(creator: CreatorSnapshot) -> Option<i64> {
    creator
        .was_admin()
        .then_some(volunteer_domain::entities::ADMIN_ROLE_CODE)
}

fn creator_user_type(creator: CreatorSnapshot) -> &'static str {
    if creator.was_admin() {
        "admin"
    } else {
        "user"
    }
}

/// Task/user assignment as served by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub task_id: TaskId,
    pub user_id: UserId,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<AssignmentRecord> for Assignment {
    fn from(record: AssignmentRecord) -> Self {
        let status = record
            .status
            .as_deref()
            .map(AssignmentStatus::parse_lenient)
            .unwrap_or_default();
        Assignment::new(record.task_id, record.user_id).with_status(status)
    }
}

/// Body of an assignment creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignmentRecord {
    pub user_id: UserId,
    pub status: String,
}

impl NewAssignmentRecord {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            status: AssignmentStatus::Assigned.as_str().to_string(),
        }
    }
}

/// User as listed by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub role: Option<i64>,
    #[serde(default)]
    pub user_type: Option<String>,
}

fn default_active() -> bool {
    true
}

impl From<UserRecord> for UserSummary {
    fn from(record: UserRecord) -> Self {
        UserSummary {
            id: record.id,
            name: record.name,
            email: record.email,
            is_active: record.is_active,
            is_admin: is_admin_role(record.role, record.user_type.as_deref()),
        }
    }
}
