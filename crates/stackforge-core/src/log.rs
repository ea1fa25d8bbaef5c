//! Logging system for Stackforge.
//!
//! Provides structured logging with multiple outputs and per-output levels.
//! Secret values must never be passed to the logging macros; log resource
//! ids and property names instead.

use stackforge_types::config::{LogConfig, LogFormat};
use stackforge_types::{LogLevel, Result, StackError};
use std::path::Path;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Map a Stackforge log level to a tracing filter.
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::None => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// Initialize the logging system with default configuration.
pub fn init_default() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(LevelFilter::INFO))
        .try_init()
        .map_err(|e| StackError::Config(format!("Failed to initialize logging: {}", e)))
}

/// Initialize logging from configuration.
///
/// Each entry adds a file output with its own level and format. With no
/// entries this falls back to [`init_default`].
pub fn init_from_config(configs: &[LogConfig]) -> Result<()> {
    if configs.is_empty() {
        return init_default();
    }

    let layers = configs
        .iter()
        .map(file_layer)
        .collect::<Result<Vec<BoxedLayer>>>()?;

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| StackError::Config(format!("Failed to initialize logging: {}", e)))
}

fn file_layer(config: &LogConfig) -> Result<BoxedLayer> {
    let path = Path::new(&config.path);
    let file_name = path
        .file_name()
        .ok_or_else(|| StackError::Config(format!("Log path has no file name: {}", config.path)))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(dir)?;
    let writer = tracing_appender::rolling::never(dir, file_name);
    let filter = level_filter(config.level);

    let layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
    };

    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter(LogLevel::None), LevelFilter::OFF);
        assert_eq!(level_filter(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(level_filter(LogLevel::Trace), LevelFilter::TRACE);
    }

    #[test]
    fn test_file_layer_creates_directory() {
        let dir = TempDir::new().unwrap();
        let config = LogConfig {
            path: dir.path().join("logs").join("engine.log").display().to_string(),
            level: LogLevel::Debug,
            format: LogFormat::Json,
        };

        assert!(file_layer(&config).is_ok());
        assert!(dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_file_layer_rejects_directory_path() {
        let config = LogConfig {
            path: "/".to_string(),
            level: LogLevel::Info,
            format: LogFormat::Compact,
        };

        assert!(file_layer(&config).is_err());
    }
}
