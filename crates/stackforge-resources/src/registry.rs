//! Resource type registration.

use crate::random_string::{self, RandomString};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{Map, Value};
use stackforge_types::{
    AttributesSchema, Properties, PropertiesSchema, Resource, ResourceId, Result, StackError,
    TypeName,
};

/// Constructor for a resource from its registered type name and resolved properties.
pub type Constructor = fn(TypeName, ResourceId, Properties) -> Box<dyn Resource>;

/// Everything the host needs to validate and build one resource type.
#[derive(Debug, Clone, Copy)]
pub struct ResourceFactory {
    /// Declared properties
    pub properties_schema: fn() -> &'static PropertiesSchema,
    /// Declared attributes
    pub attributes_schema: fn() -> &'static AttributesSchema,
    /// Constructor
    pub build: Constructor,
}

impl ResourceFactory {
    /// Resolve raw template values against the declared properties.
    pub fn validate(&self, raw: &Map<String, Value>) -> Result<Properties> {
        Properties::resolve((self.properties_schema)(), raw)
    }

    /// Validate and construct a resource instance registered as `type_name`.
    pub fn create(
        &self,
        type_name: TypeName,
        id: ResourceId,
        raw: &Map<String, Value>,
    ) -> Result<Box<dyn Resource>> {
        let resource = (self.build)(type_name, id, self.validate(raw)?);
        resource.validate()?;
        Ok(resource)
    }
}

/// Schema of a registered resource type, suitable for display.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceTypeSchema {
    /// Type name
    pub resource_type: TypeName,
    /// Declared properties
    pub properties: PropertiesSchema,
    /// Declared attributes
    pub attributes: AttributesSchema,
}

/// Built-in resource types provided by this crate.
pub fn resource_mapping() -> Vec<(&'static str, ResourceFactory)> {
    vec![(
        random_string::TYPE_NAME,
        ResourceFactory {
            properties_schema: RandomString::schema,
            attributes_schema: RandomString::attributes,
            build: RandomString::boxed,
        },
    )]
}

static GLOBAL: Lazy<ResourceRegistry> = Lazy::new(|| {
    ResourceRegistry::with_builtins().expect("built-in resource types register cleanly")
});

/// Mapping from resource type names to implementations.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    types: IndexMap<TypeName, ResourceFactory>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in type.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for (name, factory) in resource_mapping() {
            registry.register(name, factory)?;
        }
        Ok(registry)
    }

    /// Process-wide registry of built-in types.
    pub fn global() -> &'static ResourceRegistry {
        &GLOBAL
    }

    /// Register a resource type.
    pub fn register(&mut self, name: &str, factory: ResourceFactory) -> Result<()> {
        let name = TypeName::new(name)?;
        if self.types.contains_key(&name) {
            return Err(StackError::Validation(format!(
                "Resource type {} is already registered",
                name
            )));
        }

        tracing::debug!(resource_type = %name, "Registered resource type");
        self.types.insert(name, factory);
        Ok(())
    }

    /// Registered type names, in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeName> {
        self.types.keys()
    }

    /// Look up a resource type.
    pub fn factory(&self, name: &str) -> Result<&ResourceFactory> {
        self.entry(name).map(|(_, factory)| factory)
    }

    fn entry(&self, name: &str) -> Result<(&TypeName, &ResourceFactory)> {
        self.types
            .get_key_value(name)
            .ok_or_else(|| StackError::NotFound(format!("Unknown resource type: {}", name)))
    }

    /// Validate raw properties for a resource type.
    pub fn validate(&self, name: &str, raw: &Map<String, Value>) -> Result<Properties> {
        self.factory(name)?.validate(raw)
    }

    /// Validate and construct a resource instance.
    pub fn create_resource(
        &self,
        name: &str,
        id: ResourceId,
        raw: &Map<String, Value>,
    ) -> Result<Box<dyn Resource>> {
        let (type_name, factory) = self.entry(name)?;
        factory.create(type_name.clone(), id, raw)
    }

    /// Schema of a resource type.
    pub fn schema(&self, name: &str) -> Result<ResourceTypeSchema> {
        let (resource_type, factory) = self.entry(name)?;

        Ok(ResourceTypeSchema {
            resource_type: resource_type.clone(),
            properties: (factory.properties_schema)().clone(),
            attributes: (factory.attributes_schema)().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::raw;
    use serde_json::json;

    #[test]
    fn test_builtins_registered() {
        let registry = ResourceRegistry::global();
        let types: Vec<&str> = registry.types().map(TypeName::as_str).collect();
        assert_eq!(types, vec!["OS::Heat::RandomString"]);
    }

    #[test]
    fn test_create_resource() {
        let id = ResourceId::new();
        let resource = ResourceRegistry::global()
            .create_resource("OS::Heat::RandomString", id, &raw(json!({"length": 8})))
            .unwrap();

        assert_eq!(resource.id(), &id);
        assert_eq!(resource.type_name().as_str(), "OS::Heat::RandomString");
        assert_eq!(resource.properties().get_int("length"), Some(8));
    }

    #[test]
    fn test_unknown_type() {
        let err = ResourceRegistry::global()
            .create_resource("OS::Heat::RandomNumber", ResourceId::new(), &Map::new())
            .err()
            .unwrap();
        assert!(matches!(err, StackError::NotFound(_)));
    }

    #[test]
    fn test_validate_rejects_before_construction() {
        let registry = ResourceRegistry::global();
        assert!(registry.validate("OS::Heat::RandomString", &raw(json!({"length": 0}))).is_err());
        assert!(registry
            .validate("OS::Heat::RandomString", &raw(json!({"sequence": "symbols"})))
            .is_err());
    }

    #[test]
    fn test_duplicate_and_invalid_registration() {
        let mut registry = ResourceRegistry::with_builtins().unwrap();
        let (_, factory) = resource_mapping().remove(0);

        assert!(registry.register("OS::Heat::RandomString", factory).is_err());
        assert!(registry.register("RandomString", factory).is_err());
        registry.register("Custom::Password", factory).unwrap();
        assert_eq!(registry.types().count(), 2);
    }

    #[test]
    fn test_resource_reports_registered_name() {
        let mut registry = ResourceRegistry::new();
        let (_, factory) = resource_mapping().remove(0);
        registry.register("Custom::Password", factory).unwrap();

        let resource = registry
            .create_resource("Custom::Password", ResourceId::new(), &Map::new())
            .unwrap();
        assert_eq!(resource.type_name().as_str(), "Custom::Password");
        assert_eq!(resource.properties().get_int("length"), Some(32));
    }

    #[test]
    fn test_schema() {
        let schema = ResourceRegistry::global().schema("OS::Heat::RandomString").unwrap();
        let value = serde_json::to_value(&schema).unwrap();

        assert_eq!(value["resource_type"], "OS::Heat::RandomString");
        assert_eq!(value["properties"]["length"]["default"], 32);
        assert_eq!(value["properties"]["sequence"]["constraints"][0]["allowed_values"][4], "digits");
        assert!(value["attributes"]["value"]["description"].is_string());
    }
}
