//! Declarative property and attribute schemas.
//!
//! Resource plugins declare their inputs as a [`PropertiesSchema`] and their
//! outputs as an [`AttributesSchema`]. The host resolves raw template values
//! against the schema with [`Properties::resolve`] before any lifecycle
//! operation runs, so plugins only ever see typed, constrained values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use crate::enums::PropertyType;
use crate::errors::{StackError, Result};

/// Ordered property name to schema mapping.
pub type PropertiesSchema = IndexMap<String, PropertySchema>;

/// Ordered attribute name to schema mapping.
pub type AttributesSchema = IndexMap<String, AttributeSchema>;

/// A constraint on a property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Inclusive numeric range
    Range {
        /// Smallest allowed value
        #[serde(skip_serializing_if = "Option::is_none", default)]
        min: Option<i64>,
        /// Largest allowed value
        #[serde(skip_serializing_if = "Option::is_none", default)]
        max: Option<i64>,
    },
    /// Inclusive length bounds for strings and lists
    Length {
        /// Shortest allowed length
        #[serde(skip_serializing_if = "Option::is_none", default)]
        min: Option<usize>,
        /// Longest allowed length
        #[serde(skip_serializing_if = "Option::is_none", default)]
        max: Option<usize>,
    },
    /// Value must equal one of the listed values
    AllowedValues(Vec<Value>),
}

impl Constraint {
    /// Inclusive range with both bounds.
    pub fn range(min: i64, max: i64) -> Self {
        Constraint::Range { min: Some(min), max: Some(max) }
    }

    /// Inclusive length bounds with both ends.
    pub fn length(min: usize, max: usize) -> Self {
        Constraint::Length { min: Some(min), max: Some(max) }
    }

    /// Enumeration of allowed values.
    pub fn allowed_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Constraint::AllowedValues(values.into_iter().map(Into::into).collect())
    }

    /// Human-readable statement of the constraint.
    pub fn description(&self) -> String {
        match self {
            Constraint::Range { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("must be in the range {} to {}", min, max),
                (Some(min), None) => format!("must be no less than {}", min),
                (None, Some(max)) => format!("must be no greater than {}", max),
                (None, None) => "may be any number".to_string(),
            },
            Constraint::Length { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("length must be between {} and {}", min, max),
                (Some(min), None) => format!("length must be at least {}", min),
                (None, Some(max)) => format!("length must be at most {}", max),
                (None, None) => "may be any length".to_string(),
            },
            Constraint::AllowedValues(values) => {
                let rendered: Vec<String> = values.iter().map(render).collect();
                format!("must be one of: {}", rendered.join(", "))
            }
        }
    }

    /// Check a value against the constraint.
    ///
    /// Returns the constraint description as the failure reason.
    pub fn check(&self, value: &Value) -> std::result::Result<(), String> {
        let ok = match self {
            Constraint::Range { min, max } => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| format!("{} is not a number", render(value)))?;
                min.map_or(true, |m| n >= m as f64) && max.map_or(true, |m| n <= m as f64)
            }
            Constraint::Length { min, max } => {
                let len = match value {
                    Value::String(s) => s.chars().count(),
                    Value::Array(items) => items.len(),
                    other => return Err(format!("{} has no length", render(other))),
                };
                min.map_or(true, |m| len >= m) && max.map_or(true, |m| len <= m)
            }
            Constraint::AllowedValues(values) => values.contains(value),
        };

        if ok {
            Ok(())
        } else {
            Err(format!("{} {}", render(value), self.description()))
        }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

/// Schema of a single resource property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Value type
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    /// Human-readable description
    pub description: String,
    /// Value used when the property is omitted
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<Value>,
    /// Whether the property must be supplied when it has no default
    #[serde(default)]
    pub required: bool,
    /// Constraints checked after the type check
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub constraints: Vec<Constraint>,
    /// Whether a change may be applied without replacing the resource
    #[serde(default)]
    pub update_allowed: bool,
}

impl PropertySchema {
    /// Create an optional, unconstrained property.
    pub fn new(property_type: PropertyType, description: impl Into<String>) -> Self {
        Self {
            property_type,
            description: description.into(),
            default: None,
            required: false,
            constraints: Vec::new(),
            update_allowed: false,
        }
    }

    /// Integer property.
    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(PropertyType::Integer, description)
    }

    /// String property.
    pub fn string(description: impl Into<String>) -> Self {
        Self::new(PropertyType::String, description)
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Mark the property as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Allow in-place updates of this property.
    pub fn update_allowed(mut self) -> Self {
        self.update_allowed = true;
        self
    }

    /// Type-check and constraint-check a value for the named property.
    pub fn validate(&self, name: &str, value: &Value) -> Result<()> {
        if !self.property_type.matches(value) {
            return Err(StackError::Validation(format!(
                "Property '{}': {} is not a valid {}",
                name,
                render(value),
                self.property_type
            )));
        }

        for constraint in &self.constraints {
            constraint
                .check(value)
                .map_err(|reason| StackError::Validation(format!("Property '{}': {}", name, reason)))?;
        }

        Ok(())
    }
}

/// Schema of a single resource attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    /// Human-readable description
    pub description: String,
}

impl AttributeSchema {
    /// Create an attribute schema.
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into() }
    }
}

/// Resolved, validated property values of one resource instance.
///
/// Values appear in schema order. Optional properties without a value or
/// default are absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Properties(IndexMap<String, Value>);

impl Properties {
    /// Resolve raw template values against a schema.
    ///
    /// Rejects unknown property names, applies defaults, enforces required
    /// properties and checks every constraint. An explicit `null` counts as
    /// omitted.
    pub fn resolve(schema: &PropertiesSchema, raw: &Map<String, Value>) -> Result<Self> {
        if let Some(unknown) = raw.keys().find(|k| !schema.contains_key(k.as_str())) {
            return Err(StackError::Validation(format!("Unknown property '{}'", unknown)));
        }

        let mut resolved = IndexMap::with_capacity(schema.len());
        for (name, prop) in schema {
            let value = match raw.get(name) {
                None | Some(Value::Null) => prop.default.clone(),
                Some(v) => Some(v.clone()),
            };

            match value {
                Some(v) => {
                    prop.validate(name, &v)?;
                    resolved.insert(name.clone(), v);
                }
                None if prop.required => {
                    return Err(StackError::Validation(format!(
                        "Property '{}' is required",
                        name
                    )));
                }
                None => {}
            }
        }

        Ok(Self(resolved))
    }

    /// Get a property value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Get an integer property value.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// Get a string property value.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Iterate over resolved values in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Convert back to a raw value map.
    pub fn to_raw(&self) -> Map<String, Value> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Names of properties whose value differs between `self` and `other`.
    pub fn changed_keys(&self, other: &Properties) -> Vec<String> {
        let mut changed: Vec<String> = self
            .0
            .iter()
            .filter(|(k, v)| other.get(k) != Some(*v))
            .map(|(k, _)| k.clone())
            .collect();

        changed.extend(
            other
                .0
                .keys()
                .filter(|k| !self.0.contains_key(k.as_str()))
                .cloned(),
        );

        changed
    }

    /// SHA-256 hex digest of the resolved values.
    ///
    /// Two property sets share a fingerprint exactly when they are equal,
    /// including properties that do not influence the resource's behaviour.
    pub fn fingerprint(&self) -> Result<String> {
        let canonical = serde_json::to_vec(&self.0)?;
        Ok(hex::encode(Sha256::digest(&canonical)))
    }
}
