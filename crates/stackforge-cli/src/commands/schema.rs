//! Print the schema of a resource type.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use stackforge_resources::ResourceRegistry;

pub fn execute(resource_type: &str, format: OutputFormat) -> Result<()> {
    let schema = ResourceRegistry::global()
        .schema(resource_type)
        .with_context(|| format!("Cannot show schema for '{}'", resource_type))?;

    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&schema)?,
        OutputFormat::Json => serde_json::to_string_pretty(&schema)? + "\n",
    };
    print!("{}", rendered);

    Ok(())
}
