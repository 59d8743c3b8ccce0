// Command handlers for the volunteer CLI

pub mod activity;
pub mod config;
pub mod task;

pub use activity::{JoinCommand, LeaveCommand, ProgressCommand, ShowCommand};
pub use config::{ConfigAction, ConfigCommand};
pub use task::{AddTaskCommand, AssignCommand, DeleteTaskCommand, TaskStatusCommand};

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use volunteer_application::{ActivityAggregate, NoOpEventPublisher, SystemClock};
use volunteer_config::ApiConfig;
use volunteer_domain::entities::Actor;
use volunteer_domain::value_objects::ActivityId;
use volunteer_http::{ApiClient, HttpConfig};

use crate::error::CliResult;

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}

pub type CliAggregate = ActivityAggregate<ApiClient, NoOpEventPublisher>;

/// Who is acting, and the API they act against
#[derive(Clone)]
pub struct Session {
    api: Arc<ApiClient>,
    actor: Actor,
}

impl Session {
    pub fn new(api: Arc<ApiClient>, actor: Actor) -> Self {
        Self { api, actor }
    }

    /// Build the API client from the `[api]` configuration section
    pub fn connect(api: &ApiConfig, actor: Actor) -> CliResult<Self> {
        let client = ApiClient::new(http_config(api))?;
        Ok(Self::new(Arc::new(client), actor))
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Hydrated aggregate for one activity
    pub async fn open(&self, activity_id: ActivityId) -> CliResult<CliAggregate> {
        debug!(activity_id = %activity_id, actor = %self.actor.id(), "Opening activity");
        let mut aggregate = ActivityAggregate::new(
            activity_id,
            self.actor,
            self.api.clone(),
            Arc::new(NoOpEventPublisher),
            Arc::new(SystemClock),
        );
        aggregate.load().await?;
        Ok(aggregate)
    }
}

pub fn http_config(api: &ApiConfig) -> HttpConfig {
    let config = HttpConfig::new(api.base_url.clone())
        .with_timeout(Duration::from_secs(api.timeout_secs))
        .with_connect_timeout(Duration::from_secs(api.connect_timeout_secs))
        .with_user_agent(api.user_agent.clone());
    match &api.auth_token {
        Some(token) => config.with_auth_token(token.clone()),
        None => config,
    }
}
