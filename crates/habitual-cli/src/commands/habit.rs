//! Habit definition commands for CLI.

use clap::Subcommand;
use habitual_core::{CoreError, Frequency, HabitRecord, ReportFormat, Snapshot};

use super::Context;
use crate::GlobalArgs;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a new habit
    Add {
        /// Habit ID (stable, used by other commands)
        id: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Longer description
        #[arg(long, default_value = "")]
        description: String,
        /// Cadence: daily, weekly, monthly or any label (default: daily)
        #[arg(long, default_value = "daily")]
        frequency: Frequency,
    },
    /// Remove a habit and its history
    Remove {
        /// Habit ID
        id: String,
    },
    /// List habit IDs and names
    List,
}

pub fn run(globals: &GlobalArgs, action: HabitAction) -> Result<(), CoreError> {
    let ctx = Context::new(globals)?;

    match action {
        HabitAction::Add {
            id,
            name,
            description,
            frequency,
        } => {
            let mut snapshot = if ctx.store.exists() {
                ctx.load()?
            } else {
                Snapshot::new()
            };
            let habit = HabitRecord::new(id.trim(), name)
                .with_description(description)
                .with_frequency(frequency);
            snapshot.insert_habit(habit)?;
            ctx.save(&mut snapshot)?;
            println!("Habit added: {}", id.trim());
        }
        HabitAction::Remove { id } => {
            let mut snapshot = ctx.load()?;
            let removed = snapshot.remove_habit(&id)?;
            ctx.save(&mut snapshot)?;
            println!("Habit removed: {} ({})", removed.id, removed.name);
        }
        HabitAction::List => {
            let snapshot = ctx.load()?;
            if ctx.renderer.format() == ReportFormat::Json {
                let habits: Vec<_> = snapshot.iter().collect();
                println!("{}", serde_json::to_string_pretty(&habits)?);
            } else {
                for habit in snapshot.iter() {
                    println!("{}\t{}\t{}", habit.id, habit.frequency, habit.name);
                }
            }
        }
    }
    Ok(())
}
