use super::models::{parse_date, Color, Habit};
use super::render::{self, Style};
use super::HabitStore;
use crate::clock::IdSource;
use crate::error::{HabitError, Result};
use crate::storage::KeyValueStore;

use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// What every habit command needs besides the store.
pub struct Context<'a> {
    pub today: NaiveDate,
    pub style: Style,
    pub default_color: Color,
    /// Asked before destructive actions, answers whether to go ahead
    pub confirm: &'a mut dyn FnMut(&str) -> bool,
}

impl Context<'_> {
    fn date(&self, date: &Option<String>) -> Result<NaiveDate> {
        date.as_deref().map_or(Ok(self.today), parse_date)
    }
}

fn refreshed<S: KeyValueStore, I: IdSource>(
    store: &HabitStore<S, I>,
    ctx: &Context<'_>,
) -> String {
    match store.last_change() {
        Some(change) => render::refresh(change, store, ctx.today, ctx.style)
            .text()
            .to_string(),
        None => render::list(store.all(), ctx.today, ctx.style),
    }
}

fn found<S: KeyValueStore, I: IdSource>(store: &HabitStore<S, I>, id: i64) -> Result<&Habit> {
    store.get(id).ok_or(HabitError::NotFound(id))
}

#[derive(Debug, Subcommand)]
pub enum HabitCommands {
    /// Start tracking a new habit
    #[command(arg_required_else_help = true)]
    Add(AddHabit),
    /// Rename or recolor a habit
    #[command(arg_required_else_help = true)]
    Edit(EditHabit),
    /// Mark a habit done for a day, or undo it
    #[command(arg_required_else_help = true)]
    Toggle(ToggleHabit),
    /// Delete a habit and its history
    #[command(arg_required_else_help = true)]
    Delete(DeleteHabit),
    /// Show every habit
    List(ListHabits),
    /// Show one habit in detail
    #[command(arg_required_else_help = true)]
    Show(ShowHabit),
}

impl HabitCommands {
    pub fn handle_commands<S: KeyValueStore, I: IdSource>(
        &self,
        store: &mut HabitStore<S, I>,
        ctx: &mut Context<'_>,
    ) -> Result<String> {
        match self {
            HabitCommands::Add(args) => args.run(store, ctx),
            HabitCommands::Edit(args) => args.run(store, ctx),
            HabitCommands::Toggle(args) => args.run(store, ctx),
            HabitCommands::Delete(args) => args.run(store, ctx),
            HabitCommands::List(args) => args.run(store, ctx),
            HabitCommands::Show(args) => args.run(store, ctx),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct AddHabit {
    name: String,
    /// Accent color of the card, the configured default when omitted
    #[arg(short = 'c', long, value_enum)]
    accent: Option<Color>,
}

impl AddHabit {
    pub fn run<S: KeyValueStore, I: IdSource>(
        &self,
        store: &mut HabitStore<S, I>,
        ctx: &mut Context<'_>,
    ) -> Result<String> {
        let habit = store.create(&self.name, self.accent.unwrap_or(ctx.default_color))?;
        Ok(format!(
            "New habit {} - {} created successfully\n{}",
            habit.id,
            habit.name,
            refreshed(store, ctx)
        ))
    }
}

#[derive(Debug, Args, Clone)]
pub struct EditHabit {
    id: i64,
    #[arg(short, long)]
    name: Option<String>,
    #[arg(short = 'c', long, value_enum)]
    accent: Option<Color>,
}

impl EditHabit {
    pub fn run<S: KeyValueStore, I: IdSource>(
        &self,
        store: &mut HabitStore<S, I>,
        ctx: &mut Context<'_>,
    ) -> Result<String> {
        let current = found(store, self.id)?;
        let name = self.name.clone().unwrap_or_else(|| current.name.clone());
        let color = self.accent.unwrap_or(current.color);
        store
            .edit(self.id, &name, color)?
            .ok_or(HabitError::NotFound(self.id))?;
        Ok(refreshed(store, ctx))
    }
}

#[derive(Debug, Args, Clone)]
pub struct ToggleHabit {
    id: i64,
    /// Day to toggle as YYYY-MM-DD, today when omitted
    #[arg(short, long)]
    date: Option<String>,
}

impl ToggleHabit {
    pub fn run<S: KeyValueStore, I: IdSource>(
        &self,
        store: &mut HabitStore<S, I>,
        ctx: &mut Context<'_>,
    ) -> Result<String> {
        let date = ctx.date(&self.date)?;
        let result = store
            .toggle_completion(self.id, date)?
            .ok_or(HabitError::NotFound(self.id))?;
        let card = match store.get(self.id) {
            Some(habit) => render::card(habit, date, ctx.style),
            None => refreshed(store, ctx),
        };
        if result.became_completed {
            Ok(format!("{card}\nDone for {date}, keep it up!"))
        } else {
            Ok(card)
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct DeleteHabit {
    id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

impl DeleteHabit {
    pub fn run<S: KeyValueStore, I: IdSource>(
        &self,
        store: &mut HabitStore<S, I>,
        ctx: &mut Context<'_>,
    ) -> Result<String> {
        let name = found(store, self.id)?.name.clone();
        if !self.yes && !(ctx.confirm)(&format!("Delete habit \"{name}\"? This cannot be undone.")) {
            return Ok("Kept it.".to_string());
        }
        let removed = store.remove(self.id)?.ok_or(HabitError::NotFound(self.id))?;
        Ok(format!(
            "Deleted habit {} - {}\n{}",
            removed.id,
            removed.name,
            refreshed(store, ctx)
        ))
    }
}

#[derive(Debug, Args, Clone)]
pub struct ListHabits {
    /// Print the stored JSON instead of cards
    #[arg(short, long)]
    json: bool,
    /// Show completion for this day instead of today
    #[arg(short, long)]
    date: Option<String>,
}

impl ListHabits {
    pub fn run<S: KeyValueStore, I: IdSource>(
        &self,
        store: &HabitStore<S, I>,
        ctx: &Context<'_>,
    ) -> Result<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(store.all())?);
        }
        Ok(render::list(store.all(), ctx.date(&self.date)?, ctx.style))
    }
}

#[derive(Debug, Args, Clone)]
pub struct ShowHabit {
    id: i64,
    #[arg(short, long)]
    json: bool,
}

impl ShowHabit {
    pub fn run<S: KeyValueStore, I: IdSource>(
        &self,
        store: &HabitStore<S, I>,
        ctx: &Context<'_>,
    ) -> Result<String> {
        let habit = found(store, self.id)?;
        if self.json {
            return Ok(serde_json::to_string_pretty(habit)?);
        }
        Ok(render::details(habit, ctx.today))
    }
}
