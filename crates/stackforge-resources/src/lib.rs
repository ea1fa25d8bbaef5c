//! # Stackforge Resources
//!
//! Resource plugins and the glue a host needs to drive them.
//!
//! Provides:
//! - `OS::Heat::RandomString`, a resource producing a cryptographically
//!   random string from a configurable alphabet
//! - In-memory and JSON file resource data stores
//! - A registry mapping resource type names to implementations
//! - Instance lifecycle handling (create, resolve, update, delete)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod sequence;
pub mod generator;
pub mod random_string;
pub mod store;
pub mod registry;
pub mod instance;

#[cfg(test)]
mod testing;

pub use sequence::Sequence;
pub use generator::generate_random_string;
pub use random_string::RandomString;
pub use store::{FileStore, MemoryStore, ResourceData};
pub use registry::{resource_mapping, ResourceFactory, ResourceRegistry, ResourceTypeSchema};
pub use instance::{ResourceInstance, UpdateOutcome};
