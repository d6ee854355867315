use super::models::{validate_name, Change, Color, CompletionResult, Habit, ReminderTime};
use super::transitions::{self, Transition};
use crate::clock::IdSource;
use crate::error::Result;
use crate::storage::{KeyValueStore, HABITS_KEY};

use chrono::NaiveDate;

/// Owns the habit list and keeps durable storage in step with it.
///
/// Every mutation is computed on a copy, written under [`HABITS_KEY`] as one
/// document, and only then committed to memory. Ids that match nothing are
/// silent no-ops returning `Ok(None)`.
pub struct HabitStore<S, I> {
    habits: Vec<Habit>,
    storage: S,
    ids: I,
    high_water: i64,
    last_change: Option<Change>,
}

impl<S: KeyValueStore, I: IdSource> HabitStore<S, I> {
    /// Loads the collection once. A missing or unreadable document starts
    /// an empty collection instead of failing.
    pub fn load(storage: S, ids: I) -> Self {
        let habits = match storage.get(HABITS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Habit>>(&raw) {
                Ok(habits) => habits,
                Err(err) => {
                    tracing::warn!(%err, "stored habits are malformed, starting empty");
                    Vec::new()
                },
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(%err, "could not read stored habits, starting empty");
                Vec::new()
            },
        };
        let high_water = habits.iter().map(|h| h.id).max().unwrap_or(i64::MIN);
        tracing::debug!(count = habits.len(), "habits loaded");
        Self {
            habits,
            storage,
            ids,
            high_water,
            last_change: None,
        }
    }

    pub fn all(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: i64) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Scope of the most recent successful mutation, `None` after a no-op.
    pub fn last_change(&self) -> Option<Change> {
        self.last_change
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn create(&mut self, name: &str, color: Color) -> Result<Habit> {
        self.last_change = None;
        let name = validate_name(name)?;
        let id = self.fresh_id();
        let habit = self.commit(transitions::create(&self.habits, id, name, color))?;
        self.high_water = self.high_water.max(habit.id);
        tracing::info!(id = habit.id, name = %habit.name, "habit created");
        Ok(habit)
    }

    pub fn edit(&mut self, id: i64, name: &str, color: Color) -> Result<Option<Habit>> {
        self.last_change = None;
        let name = validate_name(name)?;
        self.commit_found(id, transitions::edit(&self.habits, id, name, color))
    }

    pub fn toggle_completion(
        &mut self,
        id: i64,
        today: NaiveDate,
    ) -> Result<Option<CompletionResult>> {
        self.last_change = None;
        let result = self.commit_found(id, transitions::toggle(&self.habits, id, today))?;
        if let Some(result) = result {
            tracing::info!(id, %today, completed = result.became_completed, streak = result.new_streak, "habit toggled");
        }
        Ok(result)
    }

    pub fn remove(&mut self, id: i64) -> Result<Option<Habit>> {
        self.last_change = None;
        let removed = self.commit_found(id, transitions::remove(&self.habits, id))?;
        if removed.is_some() {
            tracing::info!(id, "habit removed");
        }
        Ok(removed)
    }

    pub fn set_reminder_time(
        &mut self,
        id: i64,
        time: Option<ReminderTime>,
    ) -> Result<Option<Habit>> {
        self.last_change = None;
        self.commit_found(id, transitions::set_time(&self.habits, id, time))
    }

    pub fn set_notifications_enabled(&mut self, id: i64, enabled: bool) -> Result<Option<Habit>> {
        self.last_change = None;
        self.commit_found(id, transitions::set_notifications(&self.habits, id, enabled))
    }

    fn fresh_id(&mut self) -> i64 {
        let candidate = self.ids.next_id();
        if candidate > self.high_water {
            return candidate;
        }
        match self.high_water.checked_add(1) {
            Some(next) => next,
            // Nothing above the high-water mark, reuse the lowest free id.
            None => (1..)
                .find(|id| self.get(*id).is_none())
                .unwrap_or(candidate),
        }
    }

    fn commit_found<T>(&mut self, id: i64, transition: Option<Transition<T>>) -> Result<Option<T>> {
        match transition {
            Some(transition) => self.commit(transition).map(Some),
            None => {
                tracing::debug!(id, "no habit with this id, ignoring");
                Ok(None)
            },
        }
    }

    fn commit<T>(&mut self, transition: Transition<T>) -> Result<T> {
        let document = serde_json::to_string(&transition.habits)?;
        self.storage.set(HABITS_KEY, &document)?;
        self.habits = transition.habits;
        self.last_change = Some(transition.change);
        Ok(transition.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SequentialIds;
    use crate::error::HabitError;
    use crate::storage::{FileStore, MemoryStore};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn empty() -> HabitStore<MemoryStore, SequentialIds> {
        HabitStore::load(MemoryStore::new(), SequentialIds::starting_at(100))
    }

    fn stored(store: &HabitStore<MemoryStore, SequentialIds>) -> Vec<Habit> {
        let raw = store.storage().get(HABITS_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn create_adds_exactly_one_fresh_habit() {
        let mut store = empty();
        let habit = store.create("Drink Water", Color::Blue).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(habit.streak, 0);
        assert!(habit.completed_dates.is_empty());
        assert_eq!(store.last_change(), Some(Change::Collection));
        assert_eq!(stored(&store), store.all());
    }

    #[test]
    fn blank_names_change_nothing() {
        let mut store = empty();
        assert!(matches!(store.create("", Color::Red), Err(HabitError::EmptyName)));
        assert!(matches!(store.create("   ", Color::Red), Err(HabitError::EmptyName)));
        assert!(store.is_empty());
        assert_eq!(store.storage().writes(), 0);
        assert_eq!(store.last_change(), None);
    }

    #[test]
    fn drink_water_scenario() {
        let mut store = empty();
        let id = store.create("Drink Water", Color::Blue).unwrap().id;

        let first = store.toggle_completion(id, day(1)).unwrap().unwrap();
        assert!(first.became_completed);
        assert_eq!(first.new_streak, 1);
        assert_eq!(
            store.get(id).unwrap().completed_dates.iter().collect::<Vec<_>>(),
            vec![&day(1)]
        );
        assert_eq!(store.last_change(), Some(Change::Habit(id)));

        let second = store.toggle_completion(id, day(1)).unwrap().unwrap();
        assert!(!second.became_completed);
        assert_eq!(store.get(id).unwrap().streak, 0);
        assert!(store.get(id).unwrap().completed_dates.is_empty());
    }

    #[test]
    fn double_toggle_restores_the_habit() {
        let mut store = empty();
        let id = store.create("Read", Color::Green).unwrap().id;
        store.toggle_completion(id, day(3)).unwrap();
        let before = store.get(id).unwrap().clone();

        store.toggle_completion(id, day(4)).unwrap();
        store.toggle_completion(id, day(4)).unwrap();
        assert_eq!(store.get(id).unwrap(), &before);
    }

    #[test]
    fn streak_never_goes_below_zero() {
        let raw = r#"[{"id":1,"name":"Walk","color":"red","streak":0,"completedDates":["2024-01-01"]}]"#;
        let mut store = HabitStore::load(
            MemoryStore::new().with_entry(HABITS_KEY, raw),
            SequentialIds::starting_at(1),
        );
        let result = store.toggle_completion(1, day(1)).unwrap().unwrap();
        assert_eq!(result.new_streak, 0);
    }

    #[test]
    fn edit_keeps_progress() {
        let mut store = empty();
        let id = store.create("Drink Water", Color::Blue).unwrap().id;
        store.toggle_completion(id, day(1)).unwrap();
        store.toggle_completion(id, day(2)).unwrap();

        let edited = store.edit(id, " Drink More Water ", Color::Green).unwrap().unwrap();
        assert_eq!(edited.name, "Drink More Water");
        assert_eq!(edited.color, Color::Green);
        assert_eq!(edited.streak, 2);
        assert_eq!(edited.completed_dates.len(), 2);
        assert!(matches!(store.edit(id, " ", Color::Red), Err(HabitError::EmptyName)));
        assert_eq!(store.get(id).unwrap().name, "Drink More Water");
    }

    #[test]
    fn removed_ids_are_not_found_afterwards() {
        let mut store = empty();
        let id = store.create("Walk", Color::Orange).unwrap().id;
        assert!(store.remove(id).unwrap().is_some());
        let writes = store.storage().writes();

        assert!(store.remove(id).unwrap().is_none());
        assert!(store.edit(id, "Run", Color::Red).unwrap().is_none());
        assert!(store.toggle_completion(id, day(1)).unwrap().is_none());
        assert!(store.set_reminder_time(id, None).unwrap().is_none());
        assert!(store.set_notifications_enabled(id, true).unwrap().is_none());
        assert_eq!(store.storage().writes(), writes);
        assert_eq!(store.last_change(), None);
    }

    #[test]
    fn reminder_fields_update_in_place() {
        let mut store = empty();
        let id = store.create("Stretch", Color::Purple).unwrap().id;
        let time = ReminderTime::new(7, 30);
        store.set_reminder_time(id, time).unwrap();
        store.set_notifications_enabled(id, true).unwrap();
        let habit = store.get(id).unwrap();
        assert_eq!(habit.time, time);
        assert!(habit.notifications);
        assert_eq!(store.last_change(), Some(Change::Habit(id)));
    }

    #[test]
    fn ids_stay_unique_when_the_source_repeats() {
        let raw = r#"[{"id":500,"name":"Old","color":"blue","streak":0,"completedDates":[]}]"#;
        let mut store = HabitStore::load(
            MemoryStore::new().with_entry(HABITS_KEY, raw),
            SequentialIds::starting_at(1),
        );
        let a = store.create("A", Color::Blue).unwrap().id;
        let b = store.create("B", Color::Blue).unwrap().id;
        assert_eq!((a, b), (501, 502));

        store.remove(b).unwrap();
        let c = store.create("C", Color::Blue).unwrap().id;
        assert_eq!(c, 503);
    }

    #[test]
    fn ids_stay_unique_past_the_largest_id() {
        let raw = format!(
            r#"[{{"id":{},"name":"Last","color":"blue","streak":0,"completedDates":[]}},
                {{"id":1,"name":"First","color":"red","streak":0,"completedDates":[]}}]"#,
            i64::MAX
        );
        let mut store = HabitStore::load(
            MemoryStore::new().with_entry(HABITS_KEY, &raw),
            SequentialIds::starting_at(1),
        );
        let a = store.create("A", Color::Blue).unwrap().id;
        let b = store.create("B", Color::Blue).unwrap().id;
        assert_eq!((a, b), (2, 3));
        assert_eq!(store.len(), 4);

        let reloaded = HabitStore::load(store.storage().clone(), SequentialIds::starting_at(1));
        assert_eq!(reloaded.all(), store.all());
    }

    #[test]
    fn failed_writes_leave_memory_untouched() {
        let raw = r#"[{"id":1,"name":"Walk","color":"red","streak":0,"completedDates":[]}]"#;
        let mut store = HabitStore::load(
            MemoryStore::new().with_entry(HABITS_KEY, raw).read_only(),
            SequentialIds::starting_at(10),
        );
        assert!(matches!(
            store.toggle_completion(1, day(1)),
            Err(HabitError::Storage { .. })
        ));
        assert!(store.create("Run", Color::Blue).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().streak, 0);
        assert_eq!(store.last_change(), None);
    }

    #[test]
    fn corrupt_or_missing_storage_loads_empty() {
        let corrupt = HabitStore::load(
            MemoryStore::new().with_entry(HABITS_KEY, "{not json"),
            SequentialIds::starting_at(1),
        );
        assert!(corrupt.is_empty());

        let wrong_shape = HabitStore::load(
            MemoryStore::new().with_entry(HABITS_KEY, r#"{"habits":[]}"#),
            SequentialIds::starting_at(1),
        );
        assert!(wrong_shape.is_empty());

        assert!(empty().is_empty());
    }

    #[test]
    fn reload_matches_memory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store =
            HabitStore::load(FileStore::open(dir.path()).unwrap(), SequentialIds::starting_at(1));
        let id = store.create("Drink Water", Color::Blue).unwrap().id;
        store.create("Read", Color::Green).unwrap();
        store.toggle_completion(id, day(1)).unwrap();
        store.set_reminder_time(id, ReminderTime::new(8, 0)).unwrap();
        let expected = store.all().to_vec();

        let reloaded =
            HabitStore::load(FileStore::open(dir.path()).unwrap(), SequentialIds::starting_at(1));
        assert_eq!(reloaded.all(), expected.as_slice());
    }
}
