use crate::error::Result;
use crate::storage::{KeyValueStore, THEME_KEY};

use clap::{Args, Subcommand, ValueEnum};
use std::fmt;

#[derive(ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

/// Missing or unrecognised values fall back to light.
pub fn load_theme<S: KeyValueStore>(storage: &S) -> Theme {
    match storage.get(THEME_KEY) {
        Ok(Some(raw)) => Theme::from_str(raw.trim(), true).unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "unknown theme stored, using light");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(err) => {
            tracing::warn!(%err, "could not read theme, using light");
            Theme::default()
        },
    }
}

pub fn save_theme<S: KeyValueStore>(storage: &mut S, theme: Theme) -> Result<()> {
    storage.set(THEME_KEY, &theme.to_string())
}

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: Option<ThemeCommands>,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommands {
    /// Print the current theme
    Get,
    /// Store a theme
    Set { theme: Theme },
    /// Switch between light and dark
    Toggle,
}

impl ThemeArgs {
    pub fn run<S: KeyValueStore>(&self, storage: &mut S) -> Result<Theme> {
        let current = load_theme(storage);
        let theme = match &self.command {
            None | Some(ThemeCommands::Get) => return Ok(current),
            Some(ThemeCommands::Set { theme }) => *theme,
            Some(ThemeCommands::Toggle) => current.toggled(),
        };
        save_theme(storage, theme)?;
        tracing::info!(%theme, "theme saved");
        Ok(theme)
    }
}
