//! REST implementation of the collaborator ports
//!
//! Every call is made exactly once. Failures are mapped onto `DomainError`
//! for the resource that was addressed.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use volunteer_application::dto::{
    ActivityRecord, AssignmentRecord, NewAssignmentRecord, NewTaskRecord, ParticipantRecord,
    TaskRecord, UserRecord,
};
use volunteer_application::ports::{
    ActivityRepository, AssignmentRepository, TaskRepository, UserDirectory,
};
use volunteer_domain::entities::{
    Activity, Assignment, CreatorSnapshot, Participant, Task, TaskDraft, UserSummary,
};
use volunteer_domain::errors::{DomainError, DomainResult};
use volunteer_domain::value_objects::{ActivityId, Progress, TaskId, UserId};

use crate::client::HttpClient;
use crate::config::HttpConfig;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct MembershipRequest {
    user_id: UserId,
}

#[derive(Debug, Serialize)]
struct ProgressUpdate {
    progress: Progress,
}

/// Volunteer REST API client
pub struct ApiClient {
    http: HttpClient,
}

impl ApiClient {
    pub fn new(config: HttpConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn from_client(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

#[async_trait]
impl ActivityRepository for ApiClient {
    async fn fetch_activity(&self, id: ActivityId) -> DomainResult<Activity> {
        let record: ActivityRecord = self
            .http
            .get_json(&format!("activities/{}", id))
            .await
            .map_err(|e| e.into_domain("activity", id))?;
        Ok(record.into_domain())
    }

    async fn join_activity(&self, id: ActivityId, user_id: UserId) -> DomainResult<Participant> {
        let body = self
            .http
            .send_text(
                Method::POST,
                &format!("activities/{}/join", id),
                Some(&MembershipRequest { user_id }),
            )
            .await
            .map_err(|e| e.into_domain("activity", id))?;

        // some deployments answer 204 with no roster entry
        if body.trim().is_empty() {
            debug!(activity_id = %id, "Join returned no participant record");
            return Ok(Participant {
                user_id,
                name: String::new(),
                email: String::new(),
            });
        }
        let record: ParticipantRecord =
            serde_json::from_str(&body).map_err(|e| DomainError::CollaboratorUnavailable {
                reason: format!("Invalid participant record: {}", e),
            })?;
        Ok(record.into())
    }

    async fn leave_activity(&self, id: ActivityId, user_id: UserId) -> DomainResult<()> {
        self.http
            .send_empty(
                Method::POST,
                &format!("activities/{}/leave", id),
                Some(&MembershipRequest { user_id }),
            )
            .await
            .map_err(|e| e.into_domain("activity", id))
    }

    async fn save_progress(&self, id: ActivityId, progress: Progress) -> DomainResult<()> {
        self.http
            .send_empty(
                Method::PUT,
                &format!("activities/{}", id),
                Some(&ProgressUpdate { progress }),
            )
            .await
            .map_err(|e| e.into_domain("activity", id))
    }
}

#[async_trait]
impl TaskRepository for ApiClient {
    async fn list_tasks(&self, activity_id: ActivityId) -> DomainResult<Vec<Task>> {
        let records: Vec<TaskRecord> = self
            .http
            .get_json(&format!("activities/{}/tasks", activity_id))
            .await
            .map_err(|e| e.into_domain("activity", activity_id))?;
        Ok(records.into_iter().map(TaskRecord::into_domain).collect())
    }

    async fn create_task(
        &self,
        activity_id: ActivityId,
        draft: &TaskDraft,
        creator: CreatorSnapshot,
    ) -> DomainResult<Task> {
        let body = NewTaskRecord::from_draft(activity_id, draft, creator);
        let record: TaskRecord = self
            .http
            .send_json(Method::POST, &format!("activities/{}/tasks", activity_id), &body)
            .await
            .map_err(|e| e.into_domain("task", "new"))?;
        Ok(record.into_domain())
    }

    async fn update_task(&self, task: &Task) -> DomainResult<Task> {
        let body = TaskRecord::from_domain(task);
        let record: TaskRecord = self
            .http
            .send_json(Method::PUT, &format!("tasks/{}", task.id()), &body)
            .await
            .map_err(|e| e.into_domain("task", task.id()))?;
        Ok(record.into_domain())
    }

    async fn delete_task(&self, id: TaskId) -> DomainResult<()> {
        self.http
            .send_empty::<()>(Method::DELETE, &format!("tasks/{}", id), None)
            .await
            .map_err(|e| e.into_domain("task", id))
    }
}

#[async_trait]
impl AssignmentRepository for ApiClient {
    async fn list_assignments(&self, task_id: TaskId) -> DomainResult<Vec<Assignment>> {
        let records: Vec<AssignmentRecord> = self
            .http
            .get_json(&format!("tasks/{}/assignments", task_id))
            .await
            .map_err(|e| e.into_domain("task", task_id))?;
        Ok(records.into_iter().map(Assignment::from).collect())
    }

    async fn add_assignment(&self, task_id: TaskId, user_id: UserId) -> DomainResult<()> {
        self.http
            .send_empty(
                Method::POST,
                &format!("tasks/{}/assignments", task_id),
                Some(&NewAssignmentRecord::new(user_id)),
            )
            .await
            .map_err(|e| e.into_domain("task", task_id))
    }

    async fn remove_assignment(&self, task_id: TaskId, user_id: UserId) -> DomainResult<()> {
        self.http
            .send_empty::<()>(
                Method::DELETE,
                &format!("tasks/{}/assignments/{}", task_id, user_id),
                None,
            )
            .await
            .map_err(|e| e.into_domain("assignment", format!("{}/{}", task_id, user_id)))
    }
}

#[async_trait]
impl UserDirectory for ApiClient {
    async fn list_users(&self) -> DomainResult<Vec<UserSummary>> {
        let records: Vec<UserRecord> = self
            .http
            .get_json("users")
            .await
            .map_err(|e| e.into_domain("users", "all"))?;
        Ok(records.into_iter().map(UserSummary::from).collect())
    }
}
