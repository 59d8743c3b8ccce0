// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use volunteer_config::{AppConfig, ConfigManager, ConfigManagerTrait};
use volunteer_domain::entities::Actor;
use volunteer_domain::value_objects::{ActivityId, TaskId, TaskStatus, UserId};

use crate::commands::*;
use crate::error::{CliError, CliResult};

/// Volunteer - manage activities, their tasks, and who works on them
#[derive(Parser, Debug)]
#[command(name = "volunteer")]
#[command(bin_name = "volunteer")]
#[command(about = "Manage volunteer activities, their tasks, and task assignments")]
#[command(
    long_about = "Volunteer: a command line client for volunteer activities.\n\nShow an activity with its derived status and progress, join or leave it,\nand manage tasks and their assignees.\n\nExamples:\n  volunteer --user 7 show 12\n  volunteer --user 7 add-task 12 \"Set up tables\" --hours 2 --assign 7 9\n  volunteer --user 7 assign 12 40 9 11"
)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `volunteer_http=trace`
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Id of the acting user
    #[arg(long, global = true, value_name = "ID")]
    pub user: Option<i64>,

    /// Numeric role code of the acting user (0 = admin)
    #[arg(long, global = true, value_name = "CODE")]
    pub role: Option<i64>,

    /// Textual user type of the acting user, e.g. `admin`
    #[arg(long, global = true, value_name = "TYPE")]
    pub user_type: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show an activity, its tasks, and your permissions
    Show {
        #[arg(value_name = "ACTIVITY")]
        activity: i64,

        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Join a public activity
    Join {
        #[arg(value_name = "ACTIVITY")]
        activity: i64,
    },

    /// Leave an activity
    Leave {
        #[arg(value_name = "ACTIVITY")]
        activity: i64,

        /// Confirm leaving
        #[arg(short, long)]
        yes: bool,
    },

    /// Set the assignees of a task to exactly the given users
    Assign {
        #[arg(value_name = "ACTIVITY")]
        activity: i64,

        #[arg(value_name = "TASK")]
        task: i64,

        /// User ids; none clears the task
        #[arg(value_name = "USER")]
        users: Vec<i64>,
    },

    /// Override the progress of an ongoing activity
    Progress {
        #[arg(value_name = "ACTIVITY")]
        activity: i64,

        /// Percentage, 0 to 100
        #[arg(value_name = "PERCENT", allow_negative_numbers = true)]
        value: i64,
    },

    /// Create a task
    AddTask {
        #[arg(value_name = "ACTIVITY")]
        activity: i64,

        #[arg(value_name = "TITLE")]
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Expected effort in hours
        #[arg(long, allow_negative_numbers = true)]
        hours: Option<i64>,

        /// Users to assign right away
        #[arg(long, value_name = "USER", num_args = 1..)]
        assign: Vec<i64>,
    },

    /// Mark a task in progress or completed
    TaskStatus {
        #[arg(value_name = "ACTIVITY")]
        activity: i64,

        #[arg(value_name = "TASK")]
        task: i64,

        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Delete a task
    DeleteTask {
        #[arg(value_name = "ACTIVITY")]
        activity: i64,

        #[arg(value_name = "TASK")]
        task: i64,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigSubcommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    InProgress,
    Completed,
}

impl From<StatusArg> for TaskStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::InProgress => TaskStatus::InProgress,
            StatusArg::Completed => TaskStatus::Completed,
        }
    }
}

/// Route commands to handlers
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();
        let config = Self::load_config(&cli)?;

        crate::logging::init_logging(crate::logging::resolve_level(
            cli.log_level.as_deref(),
            &config.logging.level,
        ));

        Self::execute(&cli, &config).await
    }

    fn load_config(cli: &Cli) -> CliResult<AppConfig> {
        let mut manager = match &cli.config {
            Some(path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::new(),
        };
        Ok(manager.load_config()?)
    }

    /// The acting user from the global flags
    pub fn actor(cli: &Cli) -> CliResult<Actor> {
        let id = cli.user.ok_or_else(|| CliError::InvalidArgument {
            message: "this command needs --user <ID>".to_string(),
        })?;
        Ok(Actor::new(UserId::new(id), cli.role, cli.user_type.as_deref()))
    }

    /// Execute a command
    pub async fn execute(cli: &Cli, config: &AppConfig) -> CliResult<()> {
        if let Commands::Config { action } = &cli.command {
            let action = match action {
                ConfigSubcommand::Show => ConfigAction::Show,
                ConfigSubcommand::Init { force } => ConfigAction::Init { force: *force },
            };
            return ConfigCommand::new(action)
                .with_path(cli.config.clone())
                .execute()
                .await;
        }

        let actor = Self::actor(cli)?;
        debug!(user = %actor.id(), admin = actor.is_admin(), "Resolved actor");
        let session = Session::connect(&config.api, actor)?;

        match &cli.command {
            Commands::Show { activity, json } => {
                ShowCommand::new(session, ActivityId::new(*activity))
                    .with_json(*json)
                    .execute()
                    .await
            }
            Commands::Join { activity } => {
                JoinCommand::new(session, ActivityId::new(*activity))
                    .execute()
                    .await
            }
            Commands::Leave { activity, yes } => {
                LeaveCommand::new(session, ActivityId::new(*activity))
                    .with_confirmation(*yes)
                    .execute()
                    .await
            }
            Commands::Assign {
                activity,
                task,
                users,
            } => {
                let users = users.iter().copied().map(UserId::new).collect();
                AssignCommand::new(session, ActivityId::new(*activity), TaskId::new(*task), users)
                    .execute()
                    .await
            }
            Commands::Progress { activity, value } => {
                ProgressCommand::new(session, ActivityId::new(*activity), *value)
                    .execute()
                    .await
            }
            Commands::AddTask {
                activity,
                title,
                description,
                hours,
                assign,
            } => {
                AddTaskCommand::new(session, ActivityId::new(*activity), title.clone())
                    .with_description(description.clone())
                    .with_hours(*hours)
                    .with_assignees(assign.iter().copied().map(UserId::new).collect())
                    .execute()
                    .await
            }
            Commands::TaskStatus {
                activity,
                task,
                status,
            } => {
                TaskStatusCommand::new(
                    session,
                    ActivityId::new(*activity),
                    TaskId::new(*task),
                    (*status).into(),
                )
                .execute()
                .await
            }
            Commands::DeleteTask { activity, task } => {
                DeleteTaskCommand::new(session, ActivityId::new(*activity), TaskId::new(*task))
                    .execute()
                    .await
            }
            Commands::Config { .. } => Ok(()),
        }
    }
}
