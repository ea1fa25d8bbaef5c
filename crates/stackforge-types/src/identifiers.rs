//! Type-safe identifiers for resource instances and resource types.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use crate::errors::{StackError, Result};

static TYPE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9]*(::[A-Za-z][A-Za-z0-9]*)+$")
        .expect("type name pattern is valid")
});

/// Identity of a single resource instance.
///
/// Every instance created by the host receives a fresh identifier; a
/// replacement is a new instance and therefore has a new identifier.
/// Persisted resource data is scoped by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Allocate a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| StackError::Validation(format!("Invalid resource id '{}': {}", s, e)))
    }
}

/// A validated resource type name such as `OS::Heat::RandomString`.
///
/// Type names consist of at least two `::`-separated segments, each
/// starting with an ASCII letter and containing only ASCII alphanumerics.
///
/// # Example
///
/// ```
/// use stackforge_types::TypeName;
///
/// let name = TypeName::new("OS::Heat::RandomString").unwrap();
/// assert_eq!(name.name(), "RandomString");
///
/// assert!(TypeName::new("RandomString").is_err());
/// assert!(TypeName::new("OS::Heat::").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName(String);

impl TypeName {
    /// Create a new validated type name.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is not namespaced.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        if !Self::is_valid(name) {
            return Err(StackError::Validation(format!(
                "Invalid resource type name '{}': expected Namespace::Name",
                name
            )));
        }
        Ok(Self(name.to_string()))
    }

    /// Check if a name is valid without allocating.
    pub fn is_valid(name: &str) -> bool {
        TYPE_NAME_RE.is_match(name)
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last `::` segment.
    pub fn namespace(&self) -> &str {
        self.0.rsplit_once("::").map(|(ns, _)| ns).unwrap_or("")
    }

    /// The last `::` segment.
    pub fn name(&self) -> &str {
        self.0.rsplit_once("::").map(|(_, n)| n).unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TypeName {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for TypeName {
    type Error = StackError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_validation() {
        assert!(TypeName::new("OS::Heat::RandomString").is_ok());
        assert!(TypeName::new("Custom::Password").is_ok());

        assert!(TypeName::new("RandomString").is_err());
        assert!(TypeName::new("OS::Heat::").is_err());
        assert!(TypeName::new("::Heat").is_err());
        assert!(TypeName::new("OS::Heat::Random-String").is_err());
        assert!(TypeName::new("").is_err());
    }

    #[test]
    fn test_type_name_segments() {
        let name = TypeName::new("OS::Heat::RandomString").unwrap();
        assert_eq!(name.namespace(), "OS::Heat");
        assert_eq!(name.name(), "RandomString");
    }

    #[test]
    fn test_type_name_serde() {
        let name: TypeName = serde_json::from_str("\"OS::Heat::RandomString\"").unwrap();
        assert_eq!(name.as_str(), "OS::Heat::RandomString");
        assert!(serde_json::from_str::<TypeName>("\"nope\"").is_err());
    }

    #[test]
    fn test_resource_id_roundtrip() {
        let id = ResourceId::new();
        let parsed: ResourceId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert_ne!(ResourceId::new(), ResourceId::new());
        assert!("not-a-uuid".parse::<ResourceId>().is_err());
    }
}
