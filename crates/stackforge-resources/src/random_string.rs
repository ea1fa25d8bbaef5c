//! `OS::Heat::RandomString` resource implementation.
//!
//! Generates a random string once at creation and exposes it through the
//! `value` attribute. Useful for passwords and other secrets consumed by
//! other resources.

use crate::generator::generate_random_string;
use crate::sequence::Sequence;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use stackforge_types::{
    bug, AttributeSchema, AttributesSchema, Constraint, Properties, PropertiesSchema,
    PropertySchema, Resource, ResourceDataStore, ResourceId, Result, StackError, TypeName,
};

/// Registered type name.
pub const TYPE_NAME: &str = "OS::Heat::RandomString";

/// Property: number of characters to generate.
pub const LENGTH: &str = "length";
/// Property: character sequence to draw from.
pub const SEQUENCE: &str = "sequence";
/// Property: ignored by generation, changing it forces a new value.
pub const SALT: &str = "salt";
/// Attribute and resource data key holding the generated string.
pub const VALUE: &str = "value";

static TYPE: Lazy<TypeName> =
    Lazy::new(|| TypeName::new(TYPE_NAME).expect("RandomString type name is valid"));

static PROPERTIES_SCHEMA: Lazy<PropertiesSchema> = Lazy::new(|| {
    IndexMap::from([
        (
            LENGTH.to_string(),
            PropertySchema::integer("Length of the string to generate.")
                .with_default(32)
                .with_constraint(Constraint::range(1, 512)),
        ),
        (
            SEQUENCE.to_string(),
            PropertySchema::string("Sequence of characters to build the random string from.")
                .with_default(Sequence::default().as_str())
                .with_constraint(Constraint::allowed_values(Sequence::names())),
        ),
        (
            SALT.to_string(),
            PropertySchema::string(
                "Value which can be set or changed on stack update to trigger the resource \
                 for replacement with a new random string. The salt value itself is ignored \
                 by the random generator.",
            ),
        ),
    ])
});

static ATTRIBUTES_SCHEMA: Lazy<AttributesSchema> = Lazy::new(|| {
    IndexMap::from([(
        VALUE.to_string(),
        AttributeSchema::new("The random string generated by this resource."),
    )])
});

/// Random string resource.
#[derive(Debug, Clone)]
pub struct RandomString {
    type_name: TypeName,
    id: ResourceId,
    properties: Properties,
}

impl RandomString {
    /// Create from properties already resolved against [`Self::schema`].
    pub fn new(id: ResourceId, properties: Properties) -> Self {
        Self {
            type_name: TypeName::clone(&TYPE),
            id,
            properties,
        }
    }

    /// Report `type_name` instead of the built-in name, for aliased registrations.
    pub fn with_type_name(mut self, type_name: TypeName) -> Self {
        self.type_name = type_name;
        self
    }

    /// Resolve raw template values and create the resource.
    pub fn from_definition(id: ResourceId, raw: &Map<String, Value>) -> Result<Self> {
        let properties = Properties::resolve(Self::schema(), raw)?;
        Ok(Self::new(id, properties))
    }

    /// Declared properties.
    pub fn schema() -> &'static PropertiesSchema {
        &PROPERTIES_SCHEMA
    }

    /// Declared attributes.
    pub fn attributes() -> &'static AttributesSchema {
        &ATTRIBUTES_SCHEMA
    }

    /// Boxed constructor for the registry.
    pub fn boxed(type_name: TypeName, id: ResourceId, properties: Properties) -> Box<dyn Resource> {
        Box::new(Self::new(id, properties).with_type_name(type_name))
    }

    fn length(&self) -> Result<usize> {
        let Some(length) = self.properties.get_int(LENGTH) else {
            bug!("'{}' missing from resolved properties", LENGTH);
        };
        usize::try_from(length)
            .map_err(|_| StackError::Bug(format!("'{}' out of range: {}", LENGTH, length)))
    }

    fn sequence(&self) -> Result<Sequence> {
        let Some(name) = self.properties.get_str(SEQUENCE) else {
            bug!("'{}' missing from resolved properties", SEQUENCE);
        };
        name.parse()
            .map_err(|_| StackError::Bug(format!("no alphabet for validated sequence '{}'", name)))
    }
}

impl Resource for RandomString {
    fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_schema(&self) -> &PropertiesSchema {
        Self::schema()
    }

    fn attributes_schema(&self) -> &AttributesSchema {
        Self::attributes()
    }

    fn handle_create(&self, store: &dyn ResourceDataStore) -> Result<()> {
        let length = self.length()?;
        let sequence = self.sequence()?;

        let value = generate_random_string(sequence.alphabet(), length)?;
        store.set(&self.id, VALUE, &value, true)?;

        tracing::debug!(resource = %self.id, length, %sequence, "Stored random string");
        Ok(())
    }

    fn resolve_attribute(&self, name: &str, store: &dyn ResourceDataStore) -> Result<Option<String>> {
        if name != VALUE {
            return Ok(None);
        }
        store.get(&self.id, VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::{raw, MockStore};
    use serde_json::json;
    use stackforge_types::UpdateAction;

    fn resource(value: Value) -> RandomString {
        RandomString::from_definition(ResourceId::new(), &raw(value)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let r = resource(json!({}));
        assert_eq!(r.properties().get_int(LENGTH), Some(32));
        assert_eq!(r.properties().get_str(SEQUENCE), Some("lettersdigits"));
        assert!(r.properties().get(SALT).is_none());
        assert_eq!(r.type_name().as_str(), TYPE_NAME);
    }

    #[test]
    fn test_validation_rejects_bad_configuration() {
        for bad in [
            json!({"length": 0}),
            json!({"length": 513}),
            json!({"length": -4}),
            json!({"sequence": "punctuation"}),
            json!({"sequence": "Digits"}),
            json!({"length": "8"}),
            json!({"salt": 7}),
        ] {
            let err = RandomString::from_definition(ResourceId::new(), &raw(bad.clone()))
                .unwrap_err();
            assert!(err.is_validation(), "expected validation error for {}", bad);
        }

        assert!(RandomString::from_definition(ResourceId::new(), &raw(json!({"length": 1}))).is_ok());
        assert!(RandomString::from_definition(ResourceId::new(), &raw(json!({"length": 512}))).is_ok());
    }

    #[test]
    fn test_create_digits_and_resolve() {
        let store = MemoryStore::new();
        let r = resource(json!({"length": 8, "sequence": "digits"}));

        assert_eq!(r.resolve_attribute(VALUE, &store).unwrap(), None);
        r.handle_create(&store).unwrap();

        let value = r.resolve_attribute(VALUE, &store).unwrap().unwrap();
        assert_eq!(value.len(), 8);
        assert!(value.chars().all(|c| c.is_ascii_digit()));

        for _ in 0..5 {
            assert_eq!(r.resolve_attribute(VALUE, &store).unwrap().as_deref(), Some(value.as_str()));
        }
        assert!(store.record(r.id(), VALUE).unwrap().redact);
    }

    #[test]
    fn test_create_hexdigits() {
        let store = MemoryStore::new();
        let r = resource(json!({"length": 16, "sequence": "hexdigits"}));
        r.handle_create(&store).unwrap();

        let value = store.get(r.id(), VALUE).unwrap().unwrap();
        assert_eq!(value.len(), 16);
        assert!(value.chars().all(|c| "0123456789ABCDEF".contains(c)));
    }

    #[test]
    fn test_unknown_attribute() {
        let store = MemoryStore::new();
        let r = resource(json!({}));
        r.handle_create(&store).unwrap();

        assert_eq!(r.resolve_attribute("length", &store).unwrap(), None);
        assert_eq!(r.resolve_attribute("Value", &store).unwrap(), None);
    }

    #[test]
    fn test_persistence_failure_propagates() {
        let mut store = MockStore::new();
        store
            .expect_set()
            .times(1)
            .returning(|_, _, _, _| Err(StackError::Store("disk full".to_string())));

        let err = resource(json!({})).handle_create(&store).unwrap_err();
        assert!(matches!(err, StackError::Store(_)));
    }

    #[test]
    fn test_resolve_reads_store_only() {
        let mut store = MockStore::new();
        store.expect_set().never();
        store
            .expect_get()
            .times(2)
            .returning(|_, _| Ok(Some("persisted".to_string())));

        let r = resource(json!({}));
        assert_eq!(r.resolve_attribute(VALUE, &store).unwrap().as_deref(), Some("persisted"));
        assert_eq!(r.resolve_attribute(VALUE, &store).unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_any_change_requires_replacement() {
        let r = resource(json!({"length": 8}));
        let same = Properties::resolve(RandomString::schema(), &raw(json!({"length": 8}))).unwrap();
        let salted = Properties::resolve(
            RandomString::schema(),
            &raw(json!({"length": 8, "salt": "rotate-1"})),
        )
        .unwrap();
        let longer = Properties::resolve(RandomString::schema(), &raw(json!({"length": 9}))).unwrap();

        assert_eq!(r.update_action(&same), UpdateAction::NoChange);
        assert_eq!(r.update_action(&salted), UpdateAction::Replace);
        assert_eq!(r.update_action(&longer), UpdateAction::Replace);
        assert!(r.update_allowed_properties().is_empty());
    }

    #[test]
    fn test_salt_does_not_affect_generation() {
        let store = MemoryStore::new();
        let r = resource(json!({"length": 12, "sequence": "octdigits", "salt": "anything"}));
        r.handle_create(&store).unwrap();

        let value = store.get(r.id(), VALUE).unwrap().unwrap();
        assert_eq!(value.len(), 12);
        assert!(value.chars().all(|c| ('0'..='7').contains(&c)));
    }

    #[test]
    fn test_schema_declarations() {
        let schema = RandomString::schema();
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec![LENGTH, SEQUENCE, SALT]);
        assert_eq!(schema[LENGTH].constraints, vec![Constraint::range(1, 512)]);
        assert_eq!(schema[SEQUENCE].default, Some(json!("lettersdigits")));
        assert!(!schema[SALT].required);
        assert_eq!(RandomString::attributes().keys().collect::<Vec<_>>(), vec![VALUE]);
    }
}
