//! Core trait definitions for Stackforge abstractions.

use indexmap::IndexMap;
use crate::enums::UpdateAction;
use crate::errors::Result;
use crate::identifiers::{ResourceId, TypeName};
use crate::schema::{AttributesSchema, Properties, PropertiesSchema};

/// Trait for resource data persistence backends.
///
/// Data is scoped by the owning resource instance. Durability and
/// transactionality are up to the implementer.
pub trait ResourceDataStore: Send + Sync {
    /// Store a value under `key` for the resource instance.
    ///
    /// `redact` marks the value as sensitive: consumers must never display
    /// it unmasked.
    fn set(&self, resource: &ResourceId, key: &str, value: &str, redact: bool) -> Result<()>;

    /// Read a value previously stored under `key`.
    fn get(&self, resource: &ResourceId, key: &str) -> Result<Option<String>>;

    /// Remove all data stored for the resource instance.
    fn delete_all(&self, resource: &ResourceId) -> Result<()>;

    /// All keys of the resource instance with display-safe values.
    ///
    /// Redacted values are masked.
    fn dump(&self, resource: &ResourceId) -> Result<IndexMap<String, String>>;
}

/// Trait for resource plugins.
///
/// The host resolves properties against [`Resource::properties_schema`]
/// before constructing the resource, then drives it through its lifecycle.
pub trait Resource: Send + Sync {
    /// Registered type name, e.g. `OS::Heat::RandomString`.
    fn type_name(&self) -> &TypeName;

    /// Identity of this instance.
    fn id(&self) -> &ResourceId;

    /// Resolved property values.
    fn properties(&self) -> &Properties;

    /// Declared properties.
    fn properties_schema(&self) -> &PropertiesSchema;

    /// Declared attributes.
    fn attributes_schema(&self) -> &AttributesSchema;

    /// Cross-property validation beyond the schema.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Bring the resource into existence, persisting its data.
    fn handle_create(&self, store: &dyn ResourceDataStore) -> Result<()>;

    /// Read an attribute.
    ///
    /// Unknown attribute names yield `Ok(None)`.
    fn resolve_attribute(&self, name: &str, store: &dyn ResourceDataStore) -> Result<Option<String>>;

    /// Apply an in-place update. `self` carries the new properties.
    fn handle_update(&self, _previous: &Properties, _store: &dyn ResourceDataStore) -> Result<()> {
        Ok(())
    }

    /// Tear the resource down.
    fn handle_delete(&self, store: &dyn ResourceDataStore) -> Result<()> {
        store.delete_all(self.id())
    }

    /// Properties that may change without replacing the resource.
    fn update_allowed_properties(&self) -> Vec<&str> {
        self.properties_schema()
            .iter()
            .filter(|(_, schema)| schema.update_allowed)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Classify a change from the current properties to `new`.
    fn update_action(&self, new: &Properties) -> UpdateAction {
        let changed = self.properties().changed_keys(new);
        if changed.is_empty() {
            return UpdateAction::NoChange;
        }

        let allowed = self.update_allowed_properties();
        if changed.iter().all(|key| allowed.contains(&key.as_str())) {
            UpdateAction::UpdateInPlace
        } else {
            UpdateAction::Replace
        }
    }
}
