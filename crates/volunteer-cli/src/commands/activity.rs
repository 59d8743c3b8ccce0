// Activity-level commands: show, join, leave, progress

use async_trait::async_trait;
use volunteer_domain::value_objects::ActivityId;

use super::{Command, Session};
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;

/// Print an activity with its tasks and the caller's rights
pub struct ShowCommand {
    session: Session,
    activity_id: ActivityId,
    json: bool,
}

impl ShowCommand {
    pub fn new(session: Session, activity_id: ActivityId) -> Self {
        Self {
            session,
            activity_id,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

#[async_trait]
impl Command for ShowCommand {
    async fn execute(&self) -> CliResult<()> {
        let aggregate = self.session.open(self.activity_id).await?;
        let view = aggregate
            .view()
            .ok_or_else(|| CliError::Internal("activity loaded without a view".to_string()))?;

        if self.json {
            let text = serde_json::to_string_pretty(&view)
                .map_err(|e| CliError::Internal(format!("Failed to encode activity: {}", e)))?;
            println!("{}", text);
        } else {
            println!("{}", OutputStyle::default().activity(&view));
        }
        Ok(())
    }
}

/// Join a public activity as the current user
pub struct JoinCommand {
    session: Session,
    activity_id: ActivityId,
}

impl JoinCommand {
    pub fn new(session: Session, activity_id: ActivityId) -> Self {
        Self {
            session,
            activity_id,
        }
    }
}

#[async_trait]
impl Command for JoinCommand {
    async fn execute(&self) -> CliResult<()> {
        let mut aggregate = self.session.open(self.activity_id).await?;
        aggregate.join().await?;
        let style = OutputStyle::default();
        println!("{}", style.success(&format!("Joined activity {}", self.activity_id)));
        Ok(())
    }
}

/// Leave an activity. Without `--yes` nothing is sent.
pub struct LeaveCommand {
    session: Session,
    activity_id: ActivityId,
    confirmed: bool,
}

impl LeaveCommand {
    pub fn new(session: Session, activity_id: ActivityId) -> Self {
        Self {
            session,
            activity_id,
            confirmed: false,
        }
    }

    pub fn with_confirmation(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }
}

#[async_trait]
impl Command for LeaveCommand {
    async fn execute(&self) -> CliResult<()> {
        let mut aggregate = self.session.open(self.activity_id).await?;
        if !self.confirmed && aggregate.is_joined() {
            let style = OutputStyle::default();
            println!(
                "{}",
                style.warning("Leaving needs confirmation. Re-run with --yes to leave.")
            );
        }
        aggregate.leave(self.confirmed).await?;
        let style = OutputStyle::default();
        println!("{}", style.success(&format!("Left activity {}", self.activity_id)));
        Ok(())
    }
}

/// Override the displayed progress of an ongoing activity
pub struct ProgressCommand {
    session: Session,
    activity_id: ActivityId,
    value: i64,
}

impl ProgressCommand {
    pub fn new(session: Session, activity_id: ActivityId, value: i64) -> Self {
        Self {
            session,
            activity_id,
            value,
        }
    }
}

#[async_trait]
impl Command for ProgressCommand {
    async fn execute(&self) -> CliResult<()> {
        let mut aggregate = self.session.open(self.activity_id).await?;
        let progress = aggregate.set_progress(self.value).await?;
        let style = OutputStyle::default();
        println!(
            "{}",
            style.success(&format!(
                "Progress of activity {} set to {} ({})",
                self.activity_id,
                progress,
                aggregate.status()
            ))
        );
        Ok(())
    }
}
