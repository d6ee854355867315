use crate::{
    error::Result,
    habits::Color,
    utils::{struct_to_toml, toml_to_struct},
};

use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "HABITS_DATA_DIR";

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the configuration in effect
    Show,
    /// Print where the configuration file lives
    Path,
    /// Write the configuration file with its current values, creating it if needed
    Init,
}

impl ConfigCommands {
    pub fn handle_commands(&self, config: &Config, path: &Path) -> Result<String> {
        match self {
            ConfigCommands::Show => Ok(toml::to_string_pretty(config)?),
            ConfigCommands::Path => Ok(path.display().to_string()),
            ConfigCommands::Init => {
                struct_to_toml(config, path)?;
                tracing::info!(path = %path.display(), "configuration written");
                Ok(format!("Configuration written to {}", path.display()))
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Where habits and the theme are stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Daily rolling log files go here when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Color used by `add` when none is given
    #[serde(default)]
    pub default_color: Color,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            log_dir: None,
            log_level: default_log_level(),
            default_color: Color::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("habits")
            .join("config.toml")
    }

    pub fn load(path: &Path) -> Result<Config> {
        toml_to_struct(path)
    }

    /// Resolves the data directory: flag, then environment, then the config
    /// file, then the platform data dir.
    pub fn data_dir(&self, flag: Option<&Path>) -> PathBuf {
        if let Some(dir) = flag {
            return dir.to_path_buf();
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join("habits"))
            .unwrap_or_else(|| PathBuf::from(".habits"))
    }
}
