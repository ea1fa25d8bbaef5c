//! Resource data store implementations.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use stackforge_types::{ResourceDataStore, ResourceId, Result, StackError};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder shown instead of redacted values.
pub const REDACTED: &str = "******";

/// A single persisted value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Stored value
    pub value: String,
    /// Whether the value must be masked when displayed
    pub redact: bool,
    /// When the value was written
    pub created_at: DateTime<Utc>,
}

impl ResourceData {
    /// Create a record stamped with the current time.
    pub fn new(value: impl Into<String>, redact: bool) -> Self {
        Self {
            value: value.into(),
            redact,
            created_at: Utc::now(),
        }
    }

    /// Value safe to show in logs, diffs and dumps.
    pub fn display_value(&self) -> &str {
        if self.redact {
            REDACTED
        } else {
            &self.value
        }
    }
}

impl fmt::Debug for ResourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceData")
            .field("value", &self.display_value())
            .field("redact", &self.redact)
            .field("created_at", &self.created_at)
            .finish()
    }
}

type Records = IndexMap<String, ResourceData>;

fn masked(records: &Records) -> IndexMap<String, String> {
    records
        .iter()
        .map(|(key, data)| (key.clone(), data.display_value().to_string()))
        .collect()
}

/// In-process resource data store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<ResourceId, Records>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full record for a key, including metadata.
    pub fn record(&self, resource: &ResourceId, key: &str) -> Option<ResourceData> {
        self.data.read().get(resource).and_then(|r| r.get(key)).cloned()
    }

    /// Number of resource instances with stored data.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether no resource instance has stored data.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl ResourceDataStore for MemoryStore {
    fn set(&self, resource: &ResourceId, key: &str, value: &str, redact: bool) -> Result<()> {
        self.data
            .write()
            .entry(*resource)
            .or_default()
            .insert(key.to_string(), ResourceData::new(value, redact));
        Ok(())
    }

    fn get(&self, resource: &ResourceId, key: &str) -> Result<Option<String>> {
        Ok(self.record(resource, key).map(|data| data.value))
    }

    fn delete_all(&self, resource: &ResourceId) -> Result<()> {
        self.data.write().remove(resource);
        Ok(())
    }

    fn dump(&self, resource: &ResourceId) -> Result<IndexMap<String, String>> {
        Ok(self.data.read().get(resource).map(masked).unwrap_or_default())
    }
}

/// Resource data store persisted to a JSON file.
///
/// The file is rewritten after every mutation. A missing file is an empty
/// store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open a store backed by `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StackError::Store(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<ResourceId, Records>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            StackError::Store(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            StackError::Store(format!("Corrupt resource data in {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, all: &BTreeMap<ResourceId, Records>) -> Result<()> {
        let content = serde_json::to_string_pretty(all)?;
        let tmp = self.path.with_extension("tmp");

        fs::write(&tmp, content)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| StackError::Store(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

impl ResourceDataStore for FileStore {
    fn set(&self, resource: &ResourceId, key: &str, value: &str, redact: bool) -> Result<()> {
        let _guard = self.lock.lock();
        let mut all = self.load()?;
        all.entry(*resource)
            .or_default()
            .insert(key.to_string(), ResourceData::new(value, redact));
        self.save(&all)
    }

    fn get(&self, resource: &ResourceId, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        let mut all = self.load()?;
        Ok(all
            .remove(resource)
            .and_then(|mut records| records.shift_remove(key))
            .map(|data| data.value))
    }

    fn delete_all(&self, resource: &ResourceId) -> Result<()> {
        let _guard = self.lock.lock();
        let mut all = self.load()?;
        if all.remove(resource).is_some() {
            self.save(&all)?;
        }
        Ok(())
    }

    fn dump(&self, resource: &ResourceId) -> Result<IndexMap<String, String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.get(resource).map(masked).unwrap_or_default())
    }
}
