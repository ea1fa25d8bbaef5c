//! # Stackforge Types
//!
//! Core types, traits, and enums shared across all Stackforge crates.
//!
//! This crate provides the contract between resource plugins and the
//! orchestration host, including:
//!
//! - Type-safe identifiers for resource instances and resource type names
//! - Property and attribute schemas with declarative constraints
//! - The `Resource` and `ResourceDataStore` traits
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use stackforge_types::{ResourceId, TypeName};
//!
//! let type_name = TypeName::new("OS::Heat::RandomString").unwrap();
//! assert_eq!(type_name.namespace(), "OS::Heat");
//! assert_eq!(type_name.name(), "RandomString");
//!
//! let id = ResourceId::new();
//! assert_eq!(id, id.to_string().parse::<ResourceId>().unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod identifiers;
pub mod enums;
pub mod schema;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{StackError, Result};
pub use identifiers::{ResourceId, TypeName};
pub use enums::{LogLevel, PropertyType, ResourceStatus, UpdateAction};
pub use schema::{
    AttributeSchema, AttributesSchema, Constraint, Properties, PropertiesSchema, PropertySchema,
};
pub use traits::{Resource, ResourceDataStore};
