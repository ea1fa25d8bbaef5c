//! Show an instance and its stored data.

use crate::state::State;
use anyhow::Result;
use colored::Colorize;
use stackforge_core::EngineConfig;

pub fn execute(config: &EngineConfig, name: &str) -> Result<()> {
    let state = State::open(config)?;
    let instance = state.instance(name)?;
    let resource = instance.resource();

    println!("{}", name.cyan().bold());
    println!("  Type: {}", resource.type_name());
    println!("  Id: {}", instance.id());
    println!("  Status: {}", instance.status());

    println!("  Properties:");
    for (key, value) in resource.properties().iter() {
        println!("    {}: {}", key, value);
    }

    println!("  Data:");
    for (key, value) in instance.data()? {
        println!("    {}: {}", key, value.dimmed());
    }

    Ok(())
}
