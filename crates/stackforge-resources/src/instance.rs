//! Resource instance lifecycle.
//!
//! A [`ResourceInstance`] pairs one resource with the store holding its data
//! and tracks where it is in its lifecycle. Creation happens exactly once;
//! property changes that the resource cannot absorb in place produce a new
//! instance with a new identity.

use crate::registry::ResourceRegistry;
use serde_json::{Map, Value};
use stackforge_types::{
    Resource, ResourceDataStore, ResourceId, ResourceStatus, Result, StackError, UpdateAction,
};
use std::sync::Arc;

/// Result of applying new properties to an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Properties were identical; nothing happened
    Unchanged,
    /// The live resource absorbed the change
    UpdatedInPlace,
    /// A new resource replaced the previous one
    Replaced {
        /// Identity of the replaced resource, whose data is gone
        previous: ResourceId,
    },
}

/// A named resource under lifecycle management.
pub struct ResourceInstance {
    name: String,
    resource: Box<dyn Resource>,
    store: Arc<dyn ResourceDataStore>,
    status: ResourceStatus,
}

impl ResourceInstance {
    /// Wrap a resource that has not been created yet.
    pub fn new(
        name: impl Into<String>,
        resource: Box<dyn Resource>,
        store: Arc<dyn ResourceDataStore>,
    ) -> Self {
        Self {
            name: name.into(),
            resource,
            store,
            status: ResourceStatus::Init,
        }
    }

    /// Validate raw properties and declare a new instance of `type_name`.
    pub fn declare(
        registry: &ResourceRegistry,
        name: impl Into<String>,
        type_name: &str,
        raw: &Map<String, Value>,
        store: Arc<dyn ResourceDataStore>,
    ) -> Result<Self> {
        let resource = registry.create_resource(type_name, ResourceId::new(), raw)?;
        Ok(Self::new(name, resource, store))
    }

    /// Override the lifecycle status, e.g. when reloading persisted state.
    pub fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }

    /// Logical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of the current resource.
    pub fn id(&self) -> &ResourceId {
        self.resource.id()
    }

    /// Lifecycle status.
    pub fn status(&self) -> ResourceStatus {
        self.status
    }

    /// The managed resource.
    pub fn resource(&self) -> &dyn Resource {
        self.resource.as_ref()
    }

    /// Create the resource. Allowed once, from `Init`.
    ///
    /// On failure the instance is marked `CreateFailed` and any data the
    /// resource managed to write is removed.
    pub fn create(&mut self) -> Result<()> {
        if self.status != ResourceStatus::Init {
            return Err(StackError::Resource(format!(
                "Cannot create {} in state {}",
                self.name, self.status
            )));
        }

        tracing::info!(
            name = %self.name,
            resource = %self.id(),
            resource_type = %self.resource.type_name(),
            "Creating resource"
        );

        match self.resource.handle_create(self.store.as_ref()) {
            Ok(()) => {
                self.status = ResourceStatus::CreateComplete;
                tracing::info!(name = %self.name, "Resource created");
                Ok(())
            }
            Err(e) => {
                self.status = ResourceStatus::CreateFailed;
                tracing::warn!(name = %self.name, error = %e, "Resource creation failed");
                self.discard(self.resource.as_ref());
                Err(e)
            }
        }
    }

    /// Resolve an attribute of a created resource.
    ///
    /// Returns `None` for unknown attributes and for resources that have not
    /// been created.
    pub fn resolve(&self, attribute: &str) -> Result<Option<String>> {
        if !self.status.is_created() {
            return Ok(None);
        }

        tracing::debug!(name = %self.name, attribute, "Resolving attribute");
        self.resource.resolve_attribute(attribute, self.store.as_ref())
    }

    /// Display-safe dump of the resource's persisted data.
    pub fn data(&self) -> Result<indexmap::IndexMap<String, String>> {
        self.store.dump(self.id())
    }

    /// Apply new raw properties.
    ///
    /// Replacement creates the new resource before removing the old one; if
    /// the new resource fails to create, the current one is left untouched.
    pub fn update(
        &mut self,
        registry: &ResourceRegistry,
        raw: &Map<String, Value>,
    ) -> Result<UpdateOutcome> {
        if !self.status.is_created() {
            return Err(StackError::Resource(format!(
                "Cannot update {} in state {}",
                self.name, self.status
            )));
        }

        let type_name = self.resource.type_name().clone();
        let factory = registry.factory(type_name.as_str())?;
        let properties = factory.validate(raw)?;
        let action = self.resource.update_action(&properties);
        let fingerprint = properties.fingerprint()?;
        tracing::info!(name = %self.name, %action, %fingerprint, "Updating resource");

        match action {
            UpdateAction::NoChange => Ok(UpdateOutcome::Unchanged),
            UpdateAction::UpdateInPlace => {
                let updated = (factory.build)(type_name, *self.id(), properties);
                updated.validate()?;
                updated.handle_update(self.resource.properties(), self.store.as_ref())?;
                self.resource = updated;
                Ok(UpdateOutcome::UpdatedInPlace)
            }
            UpdateAction::Replace => {
                let replacement = (factory.build)(type_name, ResourceId::new(), properties);
                replacement.validate()?;

                if let Err(e) = replacement.handle_create(self.store.as_ref()) {
                    tracing::warn!(name = %self.name, error = %e, "Replacement creation failed");
                    self.discard(replacement.as_ref());
                    return Err(e);
                }

                let previous = *self.id();
                let old = std::mem::replace(&mut self.resource, replacement);
                if let Err(e) = old.handle_delete(self.store.as_ref()) {
                    tracing::warn!(name = %self.name, resource = %previous, error = %e, "Failed to clean up replaced resource");
                }

                tracing::info!(name = %self.name, %previous, resource = %self.id(), "Resource replaced");
                Ok(UpdateOutcome::Replaced { previous })
            }
        }
    }

    /// Delete the resource and its data.
    pub fn delete(&mut self) -> Result<()> {
        if self.status == ResourceStatus::DeleteComplete {
            return Ok(());
        }

        self.resource.handle_delete(self.store.as_ref())?;
        self.status = ResourceStatus::DeleteComplete;
        tracing::info!(name = %self.name, resource = %self.id(), "Resource deleted");
        Ok(())
    }

    fn discard(&self, resource: &dyn Resource) {
        if let Err(e) = self.store.delete_all(resource.id()) {
            tracing::warn!(resource = %resource.id(), error = %e, "Failed to discard partial data");
        }
    }
}

impl std::fmt::Debug for ResourceInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceInstance")
            .field("name", &self.name)
            .field("type", self.resource.type_name())
            .field("id", self.id())
            .field("status", &self.status)
            .finish()
    }
}
