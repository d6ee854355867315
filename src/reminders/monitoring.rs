use super::Notifier;
use crate::clock::Clock;
use crate::error::Result;
use crate::habits::Habit;

use chrono::{NaiveDateTime, Timelike};
use std::{collections::HashSet, thread::sleep, time::Duration};

/// Habits whose reminder falls on the minute of `now` and that are not yet
/// done for `now`'s day.
pub fn due(habits: &[Habit], now: NaiveDateTime) -> Vec<&Habit> {
    habits
        .iter()
        .filter(|habit| habit.notifications)
        .filter(|habit| habit.time.is_some_and(|time| time.matches(now.time())))
        .filter(|habit| !habit.is_completed_on(now.date()))
        .collect()
}

/// Notifies every due habit not already in `seen`, returning how many were sent.
pub fn check<N: Notifier + ?Sized>(
    habits: &[Habit],
    now: NaiveDateTime,
    notifier: &mut N,
    seen: &mut HashSet<(i64, NaiveDateTime)>,
) -> usize {
    let minute = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let mut sent = 0;
    for habit in due(habits, now) {
        if !seen.insert((habit.id, minute)) {
            continue;
        }
        notifier.notify(habit);
        sent += 1;
    }
    tracing::debug!(sent, %now, "reminders checked");
    sent
}

/// Re-reads the habits and checks them every `every`, forever or for
/// `times` rounds. Reading fresh each round picks up edits made by other
/// invocations in the meantime.
pub fn watch<L, N>(
    mut load: L,
    clock: &dyn Clock,
    notifier: &mut N,
    every: Duration,
    times: Option<u64>,
) -> Result<usize>
where
    L: FnMut() -> Result<Vec<Habit>>,
    N: Notifier + ?Sized,
{
    let mut seen = HashSet::new();
    let mut sent = 0;
    let mut round = 0;
    loop {
        let habits = load()?;
        sent += check(&habits, clock.now(), notifier, &mut seen);
        round += 1;
        if times.is_some_and(|times| round >= times) {
            return Ok(sent);
        }
        sleep(every);
    }
}
