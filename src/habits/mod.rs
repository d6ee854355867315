pub mod cli;
pub mod models;
pub mod render;
pub mod store;
pub mod transitions;

pub use models::{Change, Color, CompletionResult, Habit, ReminderTime};
pub use store::HabitStore;
