//! Configuration management for Stackforge.
//!
//! This module provides multi-layer configuration support with:
//! - File-based configuration
//! - Environment variable overrides
//! - Programmatic updates
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this priority order:
//! 1. Environment variables (`STACKFORGE_*`)
//! 2. Programmatically set values
//! 3. Values loaded from file
//! 4. Default values
//!
//! ## Example
//!
//! ```no_run
//! use stackforge_core::config::Config;
//!
//! let mut config = Config::load("/etc/stackforge/config")?.with_environment("STACKFORGE");
//!
//! let state_dir: Option<String> = config.get("state_dir");
//! config.set("log_level", "DEBUG")?;
//! config.save()?;
//! # Ok::<(), stackforge_core::StackError>(())
//! ```

use stackforge_types::{StackError, LogLevel, Result};
use stackforge_types::config::LogConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::fs;

/// Configuration layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// Default values
    Default = 0,
    /// Values loaded from file
    Loaded = 1,
    /// Values set programmatically
    Set = 2,
    /// Values from environment variables
    Environment = 3,
}

const PRIORITY: [ConfigLayer; 4] = [
    ConfigLayer::Environment,
    ConfigLayer::Set,
    ConfigLayer::Loaded,
    ConfigLayer::Default,
];

/// Main configuration structure with multi-layer support.
///
/// This is the low-level configuration type. For the typed engine
/// settings, see `EngineConfig`.
#[derive(Clone, Debug, Default)]
pub struct Config {
    layers: HashMap<ConfigLayer, Value>,
    file_path: Option<PathBuf>,
}

impl Config {
    /// Create a new configuration from a file path.
    ///
    /// If the file doesn't exist, an empty configuration is created.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut layers = HashMap::new();

        if path.exists() {
            let value = crate::util::load_yaml_file(path).map_err(|e| {
                StackError::Config(format!("Failed to load {}: {}", path.display(), e))
            })?;

            if !value.is_null() {
                layers.insert(ConfigLayer::Loaded, value);
            }
        }

        Ok(Self {
            layers,
            file_path: Some(path.to_path_buf()),
        })
    }

    /// Install the default layer.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.layers.insert(ConfigLayer::Default, defaults);
        self
    }

    /// Populate the environment layer from process variables.
    ///
    /// `PREFIX_LOG_LEVEL` maps to `log_level`; a double underscore separates
    /// nested keys.
    pub fn with_environment(self, prefix: &str) -> Self {
        self.with_env_vars(prefix, std::env::vars())
    }

    /// Populate the environment layer from explicit variables.
    pub fn with_env_vars<I>(mut self, prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = format!("{}_", prefix);
        let mut layer = Value::Object(Default::default());

        for (name, raw) in vars {
            let Some(key) = name.strip_prefix(&prefix) else {
                continue;
            };
            let path = key.to_lowercase().replace("__", ".");
            let value = serde_yaml::from_str::<Value>(&raw)
                .ok()
                .filter(|v| !v.is_null())
                .unwrap_or(Value::String(raw));

            if let Err(e) = Self::set_value_at_path(&mut layer, &path, value) {
                tracing::warn!("Ignoring environment variable {}: {}", name, e);
            }
        }

        self.layers.insert(ConfigLayer::Environment, layer);
        self
    }

    /// Get a configuration value by key, respecting layer priority.
    ///
    /// Returns None if the key doesn't exist in any layer.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        PRIORITY
            .iter()
            .filter_map(|layer| self.layers.get(layer))
            .filter_map(|data| Self::get_value_at_path(data, key))
            .find_map(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Set a configuration value programmatically.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| StackError::Config(format!("Failed to serialize value: {}", e)))?;

        let set_layer = self
            .layers
            .entry(ConfigLayer::Set)
            .or_insert_with(|| Value::Object(Default::default()));

        Self::set_value_at_path(set_layer, key, value)
    }

    /// Save configuration to file.
    ///
    /// Environment overrides are not written back.
    pub fn save(&self) -> Result<()> {
        let path = self
            .file_path
            .as_ref()
            .ok_or_else(|| StackError::Config("Cannot save: no file path set".to_string()))?;

        let mut persisted = Value::Object(Default::default());
        for layer in [ConfigLayer::Default, ConfigLayer::Loaded, ConfigLayer::Set] {
            if let Some(data) = self.layers.get(&layer) {
                persisted = crate::util::data::deep_merge(persisted, data.clone());
            }
        }

        let yaml = serde_yaml::to_string(&persisted)
            .map_err(|e| StackError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml)
            .map_err(|e| StackError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get merged data from all layers.
    pub fn merged_data(&self) -> Value {
        PRIORITY
            .iter()
            .rev()
            .filter_map(|layer| self.layers.get(layer))
            .fold(Value::Object(Default::default()), |merged, data| {
                crate::util::data::deep_merge(merged, data.clone())
            })
    }

    // Helper: Get value at dotted path
    fn get_value_at_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
        path.split('.').try_fold(data, |current, part| current.get(part))
    }

    // Helper: Set value at dotted path, creating intermediate objects
    fn set_value_at_path(data: &mut Value, path: &str, value: Value) -> Result<()> {
        let mut parts: Vec<&str> = path.split('.').collect();
        let last = parts
            .pop()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| StackError::Config(format!("Invalid config key '{}'", path)))?;

        let mut current = data;
        for part in parts {
            if !current.is_object() {
                *current = Value::Object(Default::default());
            }
            current = match current {
                Value::Object(map) => map
                    .entry(part.to_string())
                    .or_insert_with(|| Value::Object(Default::default())),
                _ => stackforge_types::bug!("config layer is not an object"),
            };
        }

        if !current.is_object() {
            *current = Value::Object(Default::default());
        }
        if let Value::Object(map) = current {
            map.insert(last.to_string(), value);
        }

        Ok(())
    }
}

/// Engine configuration (~/.stackforge/config).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding instance records and resource data
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Console log level
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    /// Additional log outputs
    #[serde(default)]
    pub logs: Vec<LogConfig>,
}

fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".stackforge"))
        .unwrap_or_else(|| PathBuf::from(".stackforge"))
        .join("state")
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl EngineConfig {
    /// Environment variable prefix for overrides.
    pub const ENV_PREFIX: &'static str = "STACKFORGE";

    /// Load engine configuration from default location.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Load engine configuration from specific path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::load(path)?.with_environment(Self::ENV_PREFIX);
        Self::from_config(&config)
    }

    /// Build from an already layered configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        serde_json::from_value(config.merged_data())
            .map_err(|e| StackError::Config(format!("Failed to parse engine config: {}", e)))
    }

    /// Get the default path for engine configuration.
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".stackforge").join("config"))
            .ok_or_else(|| StackError::Config("Could not determine home directory".to_string()))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            log_level: default_log_level(),
            logs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_config_layers() {
        let mut config = Config::default()
            .with_defaults(json!({"key": "default_value", "other": "default"}));

        config.layers.insert(
            ConfigLayer::Loaded,
            json!({"key": "loaded_value"}),
        );

        let value: String = config.get("key").unwrap();
        assert_eq!(value, "loaded_value");

        let other: String = config.get("other").unwrap();
        assert_eq!(other, "default");

        config.set("key", "set_value").unwrap();
        let value: String = config.get("key").unwrap();
        assert_eq!(value, "set_value");
    }

    #[test]
    fn test_environment_overrides() {
        let vars = vec![
            ("STACKFORGE_LOG_LEVEL".to_string(), "DEBUG".to_string()),
            ("STACKFORGE_NESTED__DEPTH".to_string(), "3".to_string()),
            ("UNRELATED".to_string(), "x".to_string()),
        ];
        let mut config = Config::default().with_env_vars("STACKFORGE", vars);
        config.set("log_level", "WARN").unwrap();

        let level: String = config.get("log_level").unwrap();
        assert_eq!(level, "DEBUG");
        let depth: u32 = config.get("nested.depth").unwrap();
        assert_eq!(depth, 3);
        assert!(config.get::<String>("unrelated").is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config");

        let mut config = Config::load(&path).unwrap();
        config.set("state_dir", "/var/lib/stackforge").unwrap();
        config.set("log_level", "TRACE").unwrap();
        config.save().unwrap();

        let engine = EngineConfig::from_config(&Config::load(&path).unwrap()).unwrap();
        assert_eq!(engine.state_dir, PathBuf::from("/var/lib/stackforge"));
        assert_eq!(engine.log_level, LogLevel::Trace);
        assert!(engine.logs.is_empty());
    }

    #[test]
    fn test_engine_config_lowercase_level_from_environment() {
        let vars = vec![("STACKFORGE_LOG_LEVEL".to_string(), "debug".to_string())];
        let config = Config::default().with_env_vars(EngineConfig::ENV_PREFIX, vars);

        let engine = EngineConfig::from_config(&config).unwrap();
        assert_eq!(engine.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_engine_config_defaults() {
        let engine = EngineConfig::from_config(&Config::default()).unwrap();
        assert_eq!(engine.log_level, LogLevel::Info);
        assert!(engine.state_dir.ends_with("state"));
    }

    #[test]
    fn test_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("", 1).is_err());
        assert!(config.set("a.", 1).is_err());
    }
}
