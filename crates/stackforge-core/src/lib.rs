//! # Stackforge Core
//!
//! Core utilities, configuration management, and logging shared by the
//! Stackforge resource plugins and command-line host.
//!
//! This crate provides:
//!
//! - **Configuration**: Multi-layer configuration system (defaults, file, programmatic, environment)
//! - **Logging**: Structured logging with multiple outputs and per-output levels
//! - **Data Structures**: YAML loading and deep merging
//!
//! ## Example
//!
//! ```no_run
//! use stackforge_core::{config::EngineConfig, log};
//!
//! let config = EngineConfig::load()?;
//! log::init_from_config(&config.logs)?;
//! # Ok::<(), stackforge_core::StackError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod util;

// Re-export commonly used items
pub use config::{Config, EngineConfig};
pub use stackforge_types::{StackError, Result};

/// Stackforge application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Stackforge application name
pub const APP_NAME: &str = "stackforge";
