//! Local instance state.
//!
//! Instance records live in `instances.json` under the state directory;
//! resource data lives beside them in a [`FileStore`].

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stackforge_core::EngineConfig;
use stackforge_resources::{FileStore, ResourceInstance, ResourceRegistry};
use stackforge_types::{ResourceDataStore, ResourceId, ResourceStatus, TypeName};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const STATE_FILE: &str = "instances.json";
const DATA_FILE: &str = "resource-data.json";

/// Persisted description of one instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: ResourceId,
    #[serde(rename = "type")]
    pub resource_type: TypeName,
    pub properties: Map<String, Value>,
    pub status: ResourceStatus,
}

impl InstanceRecord {
    fn from_instance(instance: &ResourceInstance) -> Self {
        let resource = instance.resource();
        Self {
            id: *instance.id(),
            resource_type: resource.type_name().clone(),
            properties: resource.properties().to_raw(),
            status: instance.status(),
        }
    }
}

/// Instance records plus the store holding their data.
pub struct State {
    path: PathBuf,
    instances: BTreeMap<String, InstanceRecord>,
    store: Arc<FileStore>,
    registry: &'static ResourceRegistry,
}

impl State {
    /// Open the state directory named by the engine config.
    pub fn open(config: &EngineConfig) -> Result<Self> {
        Self::open_dir(&config.state_dir)
    }

    pub fn open_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(STATE_FILE);
        let instances = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        let store = FileStore::open(dir.join(DATA_FILE))?;
        tracing::debug!(state = %path.display(), instances = instances.len(), "Loaded state");

        Ok(Self {
            path,
            instances,
            store: Arc::new(store),
            registry: ResourceRegistry::global(),
        })
    }

    pub fn registry(&self) -> &'static ResourceRegistry {
        self.registry
    }

    pub fn store(&self) -> Arc<dyn ResourceDataStore> {
        self.store.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    pub fn record(&self, name: &str) -> Option<&InstanceRecord> {
        self.instances.get(name)
    }

    /// Rebuild a stored instance.
    pub fn instance(&self, name: &str) -> Result<ResourceInstance> {
        let Some(record) = self.instances.get(name) else {
            bail!("No instance named '{}'", name);
        };

        let resource = self
            .registry
            .create_resource(record.resource_type.as_str(), record.id, &record.properties)
            .with_context(|| format!("Stored properties of '{}' are no longer valid", name))?;

        Ok(ResourceInstance::new(name, resource, self.store()).with_status(record.status))
    }

    /// Record an instance's current identity, properties and status.
    pub fn put(&mut self, instance: &ResourceInstance) {
        self.instances
            .insert(instance.name().to_string(), InstanceRecord::from_instance(instance));
    }

    /// Record a freshly created instance and persist the state.
    ///
    /// If the state cannot be written the instance is deleted again, so no
    /// resource data outlives its record.
    pub fn commit_created(&mut self, instance: &mut ResourceInstance) -> Result<()> {
        self.put(instance);
        let Err(e) = self.save() else {
            return Ok(());
        };

        self.remove(instance.name());
        if let Err(cleanup) = instance.delete() {
            tracing::warn!(name = instance.name(), error = %cleanup, "Failed to roll back unrecorded instance");
        }
        Err(e)
    }

    pub fn remove(&mut self, name: &str) -> Option<InstanceRecord> {
        self.instances.remove(name)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&self.instances)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_round_trip_instance() {
        let dir = TempDir::new().unwrap();
        let mut state = State::open_dir(dir.path()).unwrap();

        let mut instance = ResourceInstance::declare(
            state.registry(),
            "db_password",
            "OS::Heat::RandomString",
            &raw(json!({"length": 12, "salt": "a"})),
            state.store(),
        )
        .unwrap();
        instance.create().unwrap();
        let value = instance.resolve("value").unwrap();
        state.put(&instance);
        state.save().unwrap();

        let reopened = State::open_dir(dir.path()).unwrap();
        let record = reopened.record("db_password").unwrap();
        assert_eq!(record.status, ResourceStatus::CreateComplete);
        assert_eq!(record.properties["sequence"], "lettersdigits");

        let restored = reopened.instance("db_password").unwrap();
        assert_eq!(restored.id(), instance.id());
        assert_eq!(restored.resolve("value").unwrap(), value);
    }

    #[test]
    fn test_failed_commit_removes_data() {
        let dir = TempDir::new().unwrap();
        let mut state = State::open_dir(dir.path()).unwrap();
        let store = state.store();

        let mut instance = ResourceInstance::declare(
            state.registry(),
            "orphan",
            "OS::Heat::RandomString",
            &Map::new(),
            store.clone(),
        )
        .unwrap();
        instance.create().unwrap();
        let id = *instance.id();

        // A directory where the state file belongs makes the write fail.
        fs::create_dir(dir.path().join(STATE_FILE)).unwrap();

        assert!(state.commit_created(&mut instance).is_err());
        assert!(!state.contains("orphan"));
        assert_eq!(instance.status(), ResourceStatus::DeleteComplete);
        assert_eq!(store.get(&id, "value").unwrap(), None);
    }

    #[test]
    fn test_missing_instance() {
        let dir = TempDir::new().unwrap();
        let state = State::open_dir(dir.path()).unwrap();
        assert!(!state.contains("nope"));
        assert!(state.instance("nope").is_err());
    }
}
