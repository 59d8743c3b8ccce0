//! Volunteer Configuration Management
//!
//! Loads the API client and logging settings from an optional TOML file,
//! overridden by `VOLUNTEER_*` environment variables.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{ApiConfig, AppConfig, ConfigManager as ConfigManagerTrait, LoggingConfig};
