//! Common enumerations used throughout Stackforge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{StackError, Result};

/// Log level enumeration for the logging system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Detailed trace messages
    Trace,
}

impl FromStr for LogLevel {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Ok(LogLevel::None),
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(StackError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = StackError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::None => write!(f, "NONE"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Trace => write!(f, "TRACE"),
        }
    }
}

/// Value type of a resource property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Whole number
    Integer,
    /// Integer or floating point number
    Number,
    /// Free-form string
    String,
    /// true/false
    Boolean,
    /// Ordered list of values
    List,
    /// String-keyed map of values
    Map,
}

impl PropertyType {
    /// Check whether a JSON value is of this type.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;
        match self {
            PropertyType::Integer => value.is_i64() || value.is_u64(),
            PropertyType::Number => value.is_number(),
            PropertyType::String => value.is_string(),
            PropertyType::Boolean => value.is_boolean(),
            PropertyType::List => value.is_array(),
            PropertyType::Map => matches!(value, Value::Object(_)),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Integer => write!(f, "integer"),
            PropertyType::Number => write!(f, "number"),
            PropertyType::String => write!(f, "string"),
            PropertyType::Boolean => write!(f, "boolean"),
            PropertyType::List => write!(f, "list"),
            PropertyType::Map => write!(f, "map"),
        }
    }
}

/// How a change of properties must be applied to an existing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAction {
    /// Properties are identical
    NoChange,
    /// Every changed property may be updated on the live resource
    UpdateInPlace,
    /// The resource must be destroyed and recreated under a new identity
    Replace,
}

impl fmt::Display for UpdateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateAction::NoChange => write!(f, "no-change"),
            UpdateAction::UpdateInPlace => write!(f, "update-in-place"),
            UpdateAction::Replace => write!(f, "replace"),
        }
    }
}

/// Lifecycle status of a resource instance as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    /// Declared but not yet created
    Init,
    /// Creation succeeded and data was persisted
    CreateComplete,
    /// Creation failed; nothing user-visible was persisted
    CreateFailed,
    /// Deleted and its data cleaned up
    DeleteComplete,
}

impl ResourceStatus {
    /// Whether attributes may be resolved in this state.
    pub fn is_created(&self) -> bool {
        matches!(self, ResourceStatus::CreateComplete)
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceStatus::Init => write!(f, "INIT"),
            ResourceStatus::CreateComplete => write!(f, "CREATE_COMPLETE"),
            ResourceStatus::CreateFailed => write!(f, "CREATE_FAILED"),
            ResourceStatus::DeleteComplete => write!(f, "DELETE_COMPLETE"),
        }
    }
}
