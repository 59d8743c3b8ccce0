//! Collaborator ports
//!
//! The backing API exposes activities, tasks, task/user assignments and
//! users as resources. These traits describe the calls the engine makes;
//! `volunteer-http` provides the REST implementation and tests provide
//! in-memory ones.
//!
//! Implementations report failures as `DomainError`: `EntityNotFound` for
//! 404, `AccessDenied` for 401/403, `CollaboratorUnavailable` for transport
//! failures.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use volunteer_domain::entities::{
    Activity, Assignment, CreatorSnapshot, Participant, Task, TaskDraft, UserSummary,
};
use volunteer_domain::errors::DomainResult;
use volunteer_domain::value_objects::{ActivityId, Progress, TaskId, UserId};

/// Activity resource and roster membership
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Fetch an activity with its participant roster
    async fn fetch_activity(&self, id: ActivityId) -> DomainResult<Activity>;

    /// Join an activity, returning the roster entry the backend created
    async fn join_activity(&self, id: ActivityId, user_id: UserId) -> DomainResult<Participant>;

    /// Leave an activity
    async fn leave_activity(&self, id: ActivityId, user_id: UserId) -> DomainResult<()>;

    /// Store a hand-set progress value on the activity
    async fn save_progress(&self, id: ActivityId, progress: Progress) -> DomainResult<()>;
}

/// Task resource, always scoped to one activity
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list_tasks(&self, activity_id: ActivityId) -> DomainResult<Vec<Task>>;

    /// Create a task from an already validated draft
    async fn create_task(
        &self,
        activity_id: ActivityId,
        draft: &TaskDraft,
        creator: CreatorSnapshot,
    ) -> DomainResult<Task>;

    /// Persist a task's editable fields, returning the stored version
    async fn update_task(&self, task: &Task) -> DomainResult<Task>;

    async fn delete_task(&self, id: TaskId) -> DomainResult<()>;
}

/// Task/user assignment pairs
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn list_assignments(&self, task_id: TaskId) -> DomainResult<Vec<Assignment>>;

    async fn add_assignment(&self, task_id: TaskId, user_id: UserId) -> DomainResult<()>;

    async fn remove_assignment(&self, task_id: TaskId, user_id: UserId) -> DomainResult<()>;
}

/// User listing for assignment pickers
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self) -> DomainResult<Vec<UserSummary>>;
}

/// Everything the activity aggregate talks to
pub trait ActivityGateway:
    ActivityRepository + TaskRepository + AssignmentRepository + UserDirectory
{
}

impl<T> ActivityGateway for T where
    T: ActivityRepository + TaskRepository + AssignmentRepository + UserDirectory
{
}

/// Source of "now" for status and progress derivation
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}
