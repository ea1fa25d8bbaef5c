//! Test doubles shared by the unit tests.

use indexmap::IndexMap;
use mockall::mock;
use stackforge_types::{ResourceDataStore, ResourceId, Result};

mock! {
    pub Store {}
    impl ResourceDataStore for Store {
        fn set(&self, resource: &ResourceId, key: &str, value: &str, redact: bool) -> Result<()>;
        fn get(&self, resource: &ResourceId, key: &str) -> Result<Option<String>>;
        fn delete_all(&self, resource: &ResourceId) -> Result<()>;
        fn dump(&self, resource: &ResourceId) -> Result<IndexMap<String, String>>;
    }
}

/// Raw property map from a JSON object literal.
pub fn raw(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().cloned().unwrap_or_default()
}
