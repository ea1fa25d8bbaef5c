//! Create a resource instance.

use crate::cli::PropertyArgs;
use crate::state::State;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use stackforge_core::EngineConfig;
use stackforge_resources::ResourceInstance;

pub fn execute(
    config: &EngineConfig,
    name: &str,
    resource_type: &str,
    properties: &PropertyArgs,
) -> Result<()> {
    let mut state = State::open(config)?;
    if state.contains(name) {
        bail!("Instance '{}' already exists", name);
    }

    println!("{} {} ({})", "Creating".green().bold(), name.cyan(), resource_type);

    let mut instance = ResourceInstance::declare(
        state.registry(),
        name,
        resource_type,
        &properties.to_raw(),
        state.store(),
    )
    .context("Invalid properties")?;

    instance
        .create()
        .with_context(|| format!("Failed to create '{}'", name))?;

    state.commit_created(&mut instance)?;

    println!("{} {} is {} ({})", "✓".green().bold(), name, instance.status(), instance.id());
    Ok(())
}
