//! Show version information.

use anyhow::Result;
use colored::Colorize;
use stackforge_resources::ResourceRegistry;

pub fn execute(verbose: bool) -> Result<()> {
    println!("{} {}", "Stackforge".cyan().bold(), stackforge_core::VERSION);

    if verbose {
        println!("\nBuild Information:");
        println!("  Version: {}", stackforge_core::VERSION);
        println!("  Target: {}", std::env::consts::ARCH);
        println!("  OS: {}", std::env::consts::OS);
        println!("  Rust Version: {}", env!("CARGO_PKG_RUST_VERSION"));
        println!("  Resource Types: {}", ResourceRegistry::global().types().count());
    }

    Ok(())
}
