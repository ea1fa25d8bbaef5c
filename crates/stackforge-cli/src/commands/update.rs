//! Apply new properties to an instance.

use crate::cli::PropertyArgs;
use crate::state::State;
use anyhow::{Context, Result};
use colored::Colorize;
use stackforge_core::EngineConfig;
use stackforge_resources::UpdateOutcome;

pub fn execute(config: &EngineConfig, name: &str, properties: &PropertyArgs) -> Result<()> {
    let mut state = State::open(config)?;
    let mut instance = state.instance(name)?;

    println!("{} {}", "Updating".yellow().bold(), name.cyan());

    let stored = state
        .record(name)
        .map(|record| record.properties.clone())
        .unwrap_or_default();

    let outcome = instance
        .update(state.registry(), &properties.merged_over(stored))
        .with_context(|| format!("Failed to update '{}'", name))?;

    match outcome {
        UpdateOutcome::Unchanged => {
            println!("{} No changes", "✓".green().bold());
            return Ok(());
        }
        UpdateOutcome::UpdatedInPlace => {
            println!("{} Updated in place", "✓".green().bold());
        }
        UpdateOutcome::Replaced { previous } => {
            println!(
                "{} Replaced {} with {}",
                "✓".green().bold(),
                previous,
                instance.id()
            );
        }
    }

    state.put(&instance);
    state.save()
}
