pub mod cli;
pub mod monitoring;
pub mod notifications;

pub use cli::RemindArgs;
pub use monitoring::{check, due};
pub use notifications::{default_notifier, LogNotifier, Notifier};
