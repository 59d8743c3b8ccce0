// Configuration management

use std::path::PathBuf;

use async_trait::async_trait;
use volunteer_config::{AppConfig, ConfigManager, ConfigManagerTrait};

use super::Command;
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration (file + environment)
    Show,
    /// Write a default configuration file
    Init { force: bool },
}

/// Manage configuration
pub struct ConfigCommand {
    action: ConfigAction,
    path: Option<PathBuf>,
}

impl ConfigCommand {
    pub fn new(action: ConfigAction) -> Self {
        Self { action, path: None }
    }

    pub fn with_path(mut self, path: Option<PathBuf>) -> Self {
        self.path = path;
        self
    }

    fn manager(&self) -> ConfigManager {
        match &self.path {
            Some(path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::new(),
        }
    }

    fn show(&self) -> CliResult<()> {
        let mut manager = self.manager();
        let config = manager.load_config()?;
        let style = OutputStyle::default();
        println!("{}", style.header(&format!("# {}", manager.config_path().display())));
        println!("{}", render(&config)?);
        Ok(())
    }

    fn init(&self, force: bool) -> CliResult<()> {
        let manager = self.manager();
        let path = manager.config_path();
        if path.exists() && !force {
            return Err(CliError::InvalidArgument {
                message: format!(
                    "{} already exists; pass --force to overwrite it",
                    path.display()
                ),
            });
        }
        manager.save_config(&AppConfig::default())?;
        let style = OutputStyle::default();
        println!("{}", style.success(&format!("Wrote {}", path.display())));
        Ok(())
    }
}

#[async_trait]
impl Command for ConfigCommand {
    async fn execute(&self) -> CliResult<()> {
        match &self.action {
            ConfigAction::Show => self.show(),
            ConfigAction::Init { force } => self.init(*force),
        }
    }
}

/// TOML rendering with the bearer token masked
fn render(config: &AppConfig) -> CliResult<String> {
    let mut shown = config.clone();
    if shown.api.auth_token.is_some() {
        shown.api.auth_token = Some("********".to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| CliError::Internal(format!("Failed to render configuration: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_masks_token() {
        let mut config = AppConfig::default();
        config.api.auth_token = Some("super-secret".into());
        let text = render(&config).unwrap();
        assert!(!text.contains("super-secret"));
        assert!(text.contains("********"));
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let cmd = ConfigCommand::new(ConfigAction::Init { force: false }).with_path(Some(path.clone()));
        cmd.execute().await.unwrap();
        assert!(path.exists());

        let again = cmd.execute().await;
        assert!(matches!(again, Err(CliError::InvalidArgument { .. })));

        let forced = ConfigCommand::new(ConfigAction::Init { force: true }).with_path(Some(path));
        forced.execute().await.unwrap();
    }
}
