//! Generate a value without keeping it.

use crate::cli::PropertyArgs;
use anyhow::{Context, Result};
use stackforge_resources::{random_string, MemoryStore, ResourceInstance, ResourceRegistry};
use std::sync::Arc;

pub fn execute(properties: &PropertyArgs) -> Result<()> {
    let mut instance = ResourceInstance::declare(
        ResourceRegistry::global(),
        "generated",
        random_string::TYPE_NAME,
        &properties.to_raw(),
        Arc::new(MemoryStore::new()),
    )
    .context("Invalid properties")?;

    instance.create()?;
    let value = instance
        .resolve(random_string::VALUE)?
        .context("Resource produced no value")?;

    println!("{}", value);
    Ok(())
}
