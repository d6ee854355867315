//! Error types for habit operations

use thiserror::Error;

/// Everything that can go wrong while tracking habits.
#[derive(Debug, Error)]
pub enum HabitError {
    /// The name was empty once trimmed. Nothing was mutated.
    #[error("A habit needs a name")]
    EmptyName,

    /// No habit carries this id
    #[error("Habit {0} not found")]
    NotFound(i64),

    #[error("Invalid reminder time `{0}`, expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Durable storage could not be read or written
    #[error("Storage error on `{key}`: {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for HabitError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HabitError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl HabitError {
    pub fn storage(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            key: key.into(),
            source,
        }
    }

    /// Process exit code: 1 for things the user typed wrong, 2 for the
    /// environment failing underneath us.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptyName
            | Self::NotFound(_)
            | Self::InvalidTime(_)
            | Self::InvalidDate(_) => 1,
            Self::Storage { .. } | Self::Serialize(_) | Self::Config(_) => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, HabitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_exit_with_one() {
        assert_eq!(HabitError::EmptyName.exit_code(), 1);
        assert_eq!(HabitError::NotFound(3).exit_code(), 1);
        assert_eq!(HabitError::InvalidTime("25:00".into()).exit_code(), 1);
    }

    #[test]
    fn environment_errors_exit_with_two() {
        let err = HabitError::storage(
            "habits",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Storage error on `habits`: nope");
    }
}
