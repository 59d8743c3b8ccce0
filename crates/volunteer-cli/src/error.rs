// CLI error types

use thiserror::Error;

use volunteer_application::errors::ApplicationError;
use volunteer_config::ConfigError;
use volunteer_http::HttpError;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'volunteer --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(msg) => {
                format!(
                    "Configuration error: {}\n\nRun 'volunteer config show' to check your configuration.",
                    msg
                )
            }
            CliError::Http(msg) => {
                format!("Could not set up the API client: {}\n\nCheck api.base_url in your configuration.", msg)
            }
            CliError::Application(err) => match err {
                ApplicationError::PartialBatchFailure { failures, .. } => {
                    let mut out = err.user_message();
                    for failure in failures {
                        out.push_str(&format!(
                            "\n  - {} user {}: {}",
                            failure.op, failure.user_id, failure.reason
                        ));
                    }
                    out
                }
                other => other.user_message(),
            },
            CliError::Internal(msg) => {
                format!("Internal error: {}\n\nPlease report this issue.", msg)
            }
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<HttpError> for CliError {
    fn from(err: HttpError) -> Self {
        CliError::Http(err.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use volunteer_application::errors::{AssignmentOp, PairFailure};
    use volunteer_domain::value_objects::{TaskId, UserId};

    #[test]
    fn test_partial_failure_lists_pairs() {
        let err = CliError::from(ApplicationError::PartialBatchFailure {
            task_id: TaskId::new(3),
            failures: vec![PairFailure {
                task_id: TaskId::new(3),
                user_id: UserId::new(8),
                op: AssignmentOp::Add,
                reason: "HTTP 500".into(),
            }],
        });
        let message = err.user_message();
        assert!(message.contains("1 assignment change(s)"));
        assert!(message.contains("add user 8: HTTP 500"));
    }

    #[test]
    fn test_config_error_message() {
        let err = CliError::from(ConfigError::Validation("bad".into()));
        assert!(err.user_message().contains("volunteer config show"));
    }
}
