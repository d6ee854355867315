use super::{check, monitoring::watch, Notifier};
use crate::clock::{Clock, IdSource};
use crate::error::{HabitError, Result};
use crate::habits::{Habit, HabitStore, ReminderTime};
use crate::storage::KeyValueStore;

use clap::{Args, Subcommand, ValueEnum};
use std::{collections::HashSet, time::Duration};

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct RemindArgs {
    #[command(subcommand)]
    pub command: RemindCommands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

#[derive(Debug, Subcommand)]
pub enum RemindCommands {
    /// Set the reminder time of a habit, or `none` to clear it
    #[command(arg_required_else_help = true)]
    Time { id: i64, time: String },

    /// Turn notifications for a habit on or off
    #[command(arg_required_else_help = true)]
    Notify {
        id: i64,
        #[arg(value_enum)]
        state: Switch,
    },

    /// Notify every habit due right now. Meant to be run from cron every minute.
    Check,

    /// Keep checking for due reminders
    Watch {
        /// Seconds between checks
        #[arg(long, default_value_t = 30)]
        every: u64,
        /// Stop after this many checks
        #[arg(short, long)]
        times: Option<u64>,
    },
}

fn parse_time(raw: &str) -> Result<Option<ReminderTime>> {
    match raw.trim() {
        "" | "none" | "off" => Ok(None),
        time => time.parse().map(Some),
    }
}

impl RemindCommands {
    pub fn run<S, I, N>(
        &self,
        store: &mut HabitStore<S, I>,
        notifier: &mut N,
        clock: &dyn Clock,
        reload: &mut dyn FnMut() -> Result<Vec<Habit>>,
    ) -> Result<String>
    where
        S: KeyValueStore,
        I: IdSource,
        N: Notifier + ?Sized,
    {
        match self {
            RemindCommands::Time { id, time } => {
                let time = parse_time(time)?;
                let habit = store
                    .set_reminder_time(*id, time)?
                    .ok_or(HabitError::NotFound(*id))?;
                Ok(match habit.time {
                    Some(time) => format!("{} will remind you at {time}", habit.name),
                    None => format!("{} has no reminder", habit.name),
                })
            },
            RemindCommands::Notify { id, state } => {
                let name = store.get(*id).ok_or(HabitError::NotFound(*id))?.name.clone();
                let enabled = *state == Switch::On;
                if enabled && !notifier.request_permission() {
                    tracing::warn!(id, "notification permission denied");
                    return Ok(format!(
                        "Notifications are not permitted, {name} stays silent"
                    ));
                }
                store.set_notifications_enabled(*id, enabled)?;
                Ok(format!(
                    "Notifications for {name} {}",
                    if enabled { "on" } else { "off" }
                ))
            },
            RemindCommands::Check => {
                let sent = check(store.all(), clock.now(), notifier, &mut HashSet::new());
                Ok(format!("{sent} reminder(s) sent"))
            },
            RemindCommands::Watch { every, times } => {
                let sent = watch(
                    reload,
                    clock,
                    notifier,
                    Duration::from_secs(*every),
                    *times,
                )?;
                Ok(format!("{sent} reminder(s) sent"))
            },
        }
    }
}
