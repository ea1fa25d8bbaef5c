//! List registered resource types.

use anyhow::Result;
use colored::Colorize;
use stackforge_resources::ResourceRegistry;

pub fn execute(verbose: bool) -> Result<()> {
    let registry = ResourceRegistry::global();

    for name in registry.types() {
        println!("{}", name);

        if verbose {
            let schema = registry.schema(name.as_str())?;
            for (property, spec) in &schema.properties {
                println!("  {} ({}) {}", property.cyan(), spec.property_type, spec.description);
            }
            for attribute in schema.attributes.keys() {
                println!("  {} {}", "attribute".dimmed(), attribute.green());
            }
        }
    }

    Ok(())
}
