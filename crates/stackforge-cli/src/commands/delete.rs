//! Delete an instance.

use crate::state::State;
use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Confirm;
use stackforge_core::EngineConfig;

pub fn execute(config: &EngineConfig, name: &str, yes: bool) -> Result<()> {
    let mut state = State::open(config)?;
    let mut instance = state.instance(name)?;

    println!("{} {}", "Deleting".red().bold(), name.cyan());

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete '{}' and its data?", name))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    instance
        .delete()
        .with_context(|| format!("Failed to delete '{}'", name))?;
    state.remove(name);
    state.save()?;

    println!("{} Deleted {}", "✓".green().bold(), name);
    Ok(())
}
