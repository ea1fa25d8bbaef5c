//! Print an attribute of an instance.

use crate::state::State;
use anyhow::{Context, Result};
use stackforge_core::EngineConfig;

pub fn execute(config: &EngineConfig, name: &str, attribute: &str) -> Result<()> {
    let state = State::open(config)?;
    let instance = state.instance(name)?;

    let value = instance
        .resolve(attribute)?
        .with_context(|| format!("'{}' has no attribute '{}'", name, attribute))?;

    println!("{}", value);
    Ok(())
}
