//! CLI command implementations.

pub mod types;
pub mod schema;
pub mod generate;
pub mod create;
pub mod resolve;
pub mod show;
pub mod update;
pub mod delete;
pub mod version;
