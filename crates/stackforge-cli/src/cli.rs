//! CLI structure and command definitions.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use stackforge_core::EngineConfig;
use stackforge_resources::random_string;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stackforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local host for Stackforge resource plugins", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Engine configuration file (default: ~/.stackforge/config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding instance state and resource data
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered resource types
    Types,

    /// Show the property and attribute schema of a resource type
    Schema {
        /// Resource type, e.g. OS::Heat::RandomString
        #[arg(default_value = random_string::TYPE_NAME)]
        resource_type: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// Generate a random string without storing it
    Generate {
        #[command(flatten)]
        properties: PropertyArgs,
    },

    /// Create a resource instance
    Create {
        /// Instance name
        name: String,

        /// Resource type
        #[arg(short = 't', long = "type", default_value = random_string::TYPE_NAME)]
        resource_type: String,

        #[command(flatten)]
        properties: PropertyArgs,
    },

    /// Print an attribute of a resource instance
    Resolve {
        /// Instance name
        name: String,

        /// Attribute name
        #[arg(short, long, default_value = random_string::VALUE)]
        attribute: String,
    },

    /// Show a resource instance and its stored data
    Show {
        /// Instance name
        name: String,
    },

    /// Apply new properties to a resource instance
    Update {
        /// Instance name
        name: String,

        #[command(flatten)]
        properties: PropertyArgs,
    },

    /// Delete a resource instance and its data
    Delete {
        /// Instance name
        name: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show version information
    Version,
}

/// Schema output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Resource properties accepted on the command line.
///
/// Values are passed through unvalidated; the resource schema decides.
#[derive(Debug, Clone, Default, Args)]
pub struct PropertyArgs {
    /// Number of characters to generate
    #[arg(short, long, allow_negative_numbers = true)]
    pub length: Option<i64>,

    /// Character sequence (lettersdigits, letters, lowercase, uppercase, digits, hexdigits, octdigits)
    #[arg(short, long)]
    pub sequence: Option<String>,

    /// Salt; changing it forces a new value on update
    #[arg(long)]
    pub salt: Option<String>,
}

impl PropertyArgs {
    /// Raw property map for the resource registry.
    pub fn to_raw(&self) -> Map<String, Value> {
        let mut raw = Map::new();
        if let Some(length) = self.length {
            raw.insert(random_string::LENGTH.to_string(), length.into());
        }
        if let Some(sequence) = &self.sequence {
            raw.insert(random_string::SEQUENCE.to_string(), sequence.clone().into());
        }
        if let Some(salt) = &self.salt {
            raw.insert(random_string::SALT.to_string(), salt.clone().into());
        }
        raw
    }

    /// Overlay the passed flags on previously stored properties.
    pub fn merged_over(&self, mut base: Map<String, Value>) -> Map<String, Value> {
        base.extend(self.to_raw());
        base
    }
}

impl Cli {
    /// Load engine configuration, applying command-line overrides.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => EngineConfig::load().context("Failed to load engine config")?,
        };

        if let Some(dir) = &self.state_dir {
            config.state_dir = dir.clone();
        }

        Ok(config)
    }

    pub fn execute(&self, config: &EngineConfig) -> Result<()> {
        use crate::commands::*;

        match &self.command {
            Commands::Types => {
                types::execute(self.verbose)
            }
            Commands::Schema { resource_type, format } => {
                schema::execute(resource_type, *format)
            }
            Commands::Generate { properties } => {
                generate::execute(properties)
            }
            Commands::Create { name, resource_type, properties } => {
                create::execute(config, name, resource_type, properties)
            }
            Commands::Resolve { name, attribute } => {
                resolve::execute(config, name, attribute)
            }
            Commands::Show { name } => {
                show::execute(config, name)
            }
            Commands::Update { name, properties } => {
                update::execute(config, name, properties)
            }
            Commands::Delete { name, yes } => {
                delete::execute(config, name, *yes)
            }
            Commands::Version => {
                version::execute(self.verbose)
            }
        }
    }
}
