//! Pure state transitions over a habit list.
//!
//! Each function takes the current list and returns the list it should
//! become, the [`Change`] describing what moved, and the value handed back
//! to the caller. `None` means the id matched nothing and nothing changed.
//! Names are expected to be validated already.

use super::models::{Change, Color, CompletionResult, Habit, ReminderTime};
use chrono::NaiveDate;

#[derive(Debug)]
pub struct Transition<T> {
    pub habits: Vec<Habit>,
    pub change: Change,
    pub value: T,
}

fn update<T>(
    habits: &[Habit],
    id: i64,
    change: Change,
    apply: impl FnOnce(&mut Habit) -> T,
) -> Option<Transition<T>> {
    let index = habits.iter().position(|h| h.id == id)?;
    let mut next = habits.to_vec();
    let value = apply(&mut next[index]);
    Some(Transition {
        habits: next,
        change,
        value,
    })
}

pub fn create(habits: &[Habit], id: i64, name: String, color: Color) -> Transition<Habit> {
    let habit = Habit::new(id, name, color);
    let mut next = habits.to_vec();
    next.push(habit.clone());
    Transition {
        habits: next,
        change: Change::Collection,
        value: habit,
    }
}

pub fn edit(habits: &[Habit], id: i64, name: String, color: Color) -> Option<Transition<Habit>> {
    update(habits, id, Change::Collection, |habit| {
        habit.name = name;
        habit.color = color;
        habit.clone()
    })
}

/// Flips completion for `date`. The streak moves with the flip as a plain
/// counter; it is not recomputed from the calendar.
pub fn toggle(
    habits: &[Habit],
    id: i64,
    date: NaiveDate,
) -> Option<Transition<CompletionResult>> {
    update(habits, id, Change::Habit(id), |habit| {
        let became_completed = habit.completed_dates.insert(date);
        if became_completed {
            habit.streak = habit.streak.saturating_add(1);
        } else {
            habit.completed_dates.remove(&date);
            habit.streak = habit.streak.saturating_sub(1);
        }
        CompletionResult {
            became_completed,
            new_streak: habit.streak,
        }
    })
}

pub fn remove(habits: &[Habit], id: i64) -> Option<Transition<Habit>> {
    let index = habits.iter().position(|h| h.id == id)?;
    let mut next = habits.to_vec();
    let removed = next.remove(index);
    Some(Transition {
        habits: next,
        change: Change::Collection,
        value: removed,
    })
}

pub fn set_time(
    habits: &[Habit],
    id: i64,
    time: Option<ReminderTime>,
) -> Option<Transition<Habit>> {
    update(habits, id, Change::Habit(id), |habit| {
        habit.time = time;
        habit.clone()
    })
}

pub fn set_notifications(
    habits: &[Habit],
    id: i64,
    enabled: bool,
) -> Option<Transition<Habit>> {
    update(habits, id, Change::Habit(id), |habit| {
        habit.notifications = enabled;
        habit.clone()
    })
}
