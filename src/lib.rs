//! Track daily habits from the terminal.
//!
//! [`habits::HabitStore`] owns the habit list and writes it back to a
//! [`storage::KeyValueStore`] after every change. Rendering and the command
//! line sit on top and never hold state of their own.

pub mod cli;
pub mod clock;
pub mod config;
pub mod enums;
pub mod error;
pub mod habits;
pub mod logging;
pub mod reminders;
pub mod storage;
pub mod theme;
pub mod utils;

pub use error::{HabitError, Result};
