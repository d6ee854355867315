//! Terminal projection of the habit list.
//!
//! Nothing here holds state: every view is rebuilt from the store on demand.

use super::models::{Change, Habit};
use super::store::HabitStore;
use crate::clock::IdSource;
use crate::storage::KeyValueStore;

use chrono::NaiveDate;
use std::fmt::Write;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub color: bool,
}

/// What to print after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    Full(String),
    Single(String),
}

impl Refresh {
    pub fn text(&self) -> &str {
        match self {
            Refresh::Full(text) | Refresh::Single(text) => text,
        }
    }
}

pub fn date_header(today: NaiveDate) -> String {
    today.format("%A, %B %-d").to_string()
}

pub fn empty_state() -> &'static str {
    "No habits yet\nRun `habits add <name>` to start tracking your first habit."
}

pub fn card(habit: &Habit, today: NaiveDate, style: Style) -> String {
    let check = if habit.is_completed_on(today) { "[x]" } else { "[ ]" };
    let mut line = String::new();
    if style.color {
        let (r, g, b) = habit.color.rgb();
        let _ = write!(line, "\x1b[38;2;{r};{g};{b}m{check}\x1b[0m");
    } else {
        line.push_str(check);
    }
    let _ = write!(
        line,
        " {:>13}  {}  {} day streak",
        habit.id, habit.name, habit.streak
    );
    if let Some(time) = habit.time {
        let bell = if habit.notifications { " (notify)" } else { "" };
        let _ = write!(line, "  at {time}{bell}");
    }
    line
}

pub fn list(habits: &[Habit], today: NaiveDate, style: Style) -> String {
    let mut out = date_header(today);
    out.push('\n');
    if habits.is_empty() {
        out.push_str(empty_state());
        return out;
    }
    for habit in habits {
        out.push_str(&card(habit, today, style));
        out.push('\n');
    }
    out.pop();
    out
}

/// Re-renders only as much as `change` invalidated.
pub fn refresh<S: KeyValueStore, I: IdSource>(
    change: Change,
    store: &HabitStore<S, I>,
    today: NaiveDate,
    style: Style,
) -> Refresh {
    match change {
        Change::Habit(id) => match store.get(id) {
            Some(habit) => Refresh::Single(card(habit, today, style)),
            None => Refresh::Full(list(store.all(), today, style)),
        },
        Change::Collection => Refresh::Full(list(store.all(), today, style)),
    }
}

/// Multi-line detail view used by `show`.
pub fn details(habit: &Habit, today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", habit.name, habit.id);
    let _ = writeln!(out, "color:         {}", habit.color);
    let _ = writeln!(out, "streak:        {} day streak", habit.streak);
    let _ = writeln!(
        out,
        "today:         {}",
        if habit.is_completed_on(today) { "done" } else { "pending" }
    );
    let reminder = habit.time.map(|t| t.to_string()).unwrap_or_else(|| "none".into());
    let _ = writeln!(out, "reminder:      {reminder}");
    let _ = writeln!(
        out,
        "notifications: {}",
        if habit.notifications { "on" } else { "off" }
    );
    let _ = write!(out, "completed:     {}", habit.completed_dates.len());
    out
}
