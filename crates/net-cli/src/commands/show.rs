//! Show command

use std::sync::Arc;

use anyhow::Result;
use clap::ValueEnum;

use ifcfg_network_config::InterfaceConfig;

use crate::commands::open_interface;
use crate::settings::Settings;

/// Output format for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Show command implementation
pub struct ShowCommand {
    settings: Arc<Settings>,
}

impl ShowCommand {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Print the parsed configuration of an interface
    pub async fn execute(&self, interface: &str, format: OutputFormat) -> Result<()> {
        let applier = open_interface(&self.settings, interface).await?;
        println!("{}", self.render(applier.config(), format)?);
        Ok(())
    }

    /// Render a configuration in file order
    pub fn render(&self, config: &InterfaceConfig, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            OutputFormat::Text => {
                let width = config.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
                Ok(config
                    .iter()
                    .map(|(key, value)| format!("{:<width$}  {}", key, value, width = width))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }
}
