// Task-level commands: add, status, delete, assign

use async_trait::async_trait;
use volunteer_application::CreateTaskCommand;
use volunteer_domain::entities::TaskDraft;
use volunteer_domain::value_objects::{ActivityId, TaskId, TaskStatus, UserId};

use super::{Command, Session};
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Create a task in an activity
pub struct AddTaskCommand {
    session: Session,
    activity_id: ActivityId,
    draft: TaskDraft,
    assignees: Vec<UserId>,
}

impl AddTaskCommand {
    pub fn new(session: Session, activity_id: ActivityId, title: impl Into<String>) -> Self {
        Self {
            session,
            activity_id,
            draft: TaskDraft::titled(title),
            assignees: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.draft.description = description.unwrap_or_default();
        self
    }

    pub fn with_hours(mut self, hours: Option<i64>) -> Self {
        self.draft.total_hours = hours;
        self
    }

    pub fn with_assignees(mut self, assignees: Vec<UserId>) -> Self {
        self.assignees = assignees;
        self
    }
}

#[async_trait]
impl Command for AddTaskCommand {
    async fn execute(&self) -> CliResult<()> {
        let mut aggregate = self.session.open(self.activity_id).await?;
        let cmd = CreateTaskCommand::new(self.draft.clone()).with_assignees(self.assignees.clone());
        let task_id = aggregate.add_task(cmd).await?;
        let style = OutputStyle::default();
        println!(
            "{}",
            style.success(&format!(
                "Created task {} ({} now at {})",
                task_id,
                self.activity_id,
                aggregate.progress()
            ))
        );
        Ok(())
    }
}

/// Move a task to another status
pub struct TaskStatusCommand {
    session: Session,
    activity_id: ActivityId,
    task_id: TaskId,
    status: TaskStatus,
}

impl TaskStatusCommand {
    pub fn new(session: Session, activity_id: ActivityId, task_id: TaskId, status: TaskStatus) -> Self {
        Self {
            session,
            activity_id,
            task_id,
            status,
        }
    }
}

#[async_trait]
impl Command for TaskStatusCommand {
    async fn execute(&self) -> CliResult<()> {
        let mut aggregate = self.session.open(self.activity_id).await?;
        aggregate.set_task_status(self.task_id, self.status).await?;
        let style = OutputStyle::default();
        println!(
            "{}",
            style.success(&format!(
                "Task {} is {}; activity is {} at {}",
                self.task_id,
                self.status,
                aggregate.status(),
                aggregate.progress()
            ))
        );
        Ok(())
    }
}

pub struct DeleteTaskCommand {
    session: Session,
    activity_id: ActivityId,
    task_id: TaskId,
}

impl DeleteTaskCommand {
    pub fn new(session: Session, activity_id: ActivityId, task_id: TaskId) -> Self {
        Self {
            session,
            activity_id,
            task_id,
        }
    }
}

#[async_trait]
impl Command for DeleteTaskCommand {
    async fn execute(&self) -> CliResult<()> {
        let mut aggregate = self.session.open(self.activity_id).await?;
        aggregate.delete_task(self.task_id).await?;
        let style = OutputStyle::default();
        println!("{}", style.success(&format!("Deleted task {}", self.task_id)));
        Ok(())
    }
}

/// Replace a task's assignees with exactly the given users
pub struct AssignCommand {
    session: Session,
    activity_id: ActivityId,
    task_id: TaskId,
    users: Vec<UserId>,
}

impl AssignCommand {
    pub fn new(session: Session, activity_id: ActivityId, task_id: TaskId, users: Vec<UserId>) -> Self {
        Self {
            session,
            activity_id,
            task_id,
            users,
        }
    }
}

#[async_trait]
impl Command for AssignCommand {
    async fn execute(&self) -> CliResult<()> {
        let mut aggregate = self.session.open(self.activity_id).await?;
        let diff = aggregate
            .set_assignees(self.task_id, self.users.iter().copied())
            .await?;

        let style = OutputStyle::default();
        if diff.is_empty() {
            println!("{}", style.success("Assignees already up to date"));
        } else {
            println!(
                "{}",
                style.success(&format!(
                    "Task {}: {} added, {} removed",
                    self.task_id,
                    diff.to_add.len(),
                    diff.to_remove.len()
                ))
            );
        }
        Ok(())
    }
}
