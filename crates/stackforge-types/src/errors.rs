//! Error types for Stackforge operations.

use thiserror::Error;

/// The main error type for Stackforge operations.
///
/// Covers every failure a resource plugin can report to its host, from
/// property validation through persistence and randomness failures.
#[derive(Error, Debug)]
pub enum StackError {
    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Property or schema validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource lifecycle error
    #[error("Resource error: {0}")]
    Resource(String),

    /// Resource data persistence error
    #[error("Store error: {0}")]
    Store(String),

    /// Secure randomness source could not be used
    #[error("Entropy error: {0}")]
    Entropy(String),

    /// Requested object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal bug - should never happen in production
    #[error("Bug detected: {0}\n\nThis is an internal error. Please report this issue at:\nhttps://github.com/stackforge-community/stackforge/issues")]
    Bug(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for Stackforge operations.
pub type Result<T> = std::result::Result<T, StackError>;

/// Helper macro to create and return a StackError::Bug
///
/// This should be used for conditions that should never occur
/// in normal operation and indicate a broken plugin contract.
///
/// # Example
///
/// ```ignore
/// if alphabet.is_empty() {
///     bug!("empty alphabet for sequence {}", sequence);
/// }
/// ```
#[macro_export]
macro_rules! bug {
    ($msg:expr) => {
        return Err($crate::StackError::Bug($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::StackError::Bug(format!($fmt, $($arg)*)))
    };
}

/// Helper macro to bail out with a StackError
///
/// This is used for expected error conditions.
///
/// # Example
///
/// ```ignore
/// if !valid {
///     bail!(Validation, "Invalid property: {}", name);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::StackError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::StackError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::StackError::Other($msg.to_string()))
    };
}

impl StackError {
    /// Whether this error was raised before any side effect took place.
    pub fn is_validation(&self) -> bool {
        matches!(self, StackError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails_validation(name: &str) -> Result<()> {
        bail!(Validation, "Unknown property: {}", name);
    }

    fn fails_contract() -> Result<()> {
        bug!("unreachable branch");
    }

    #[test]
    fn test_bail_macro() {
        let err = fails_validation("colour").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: Unknown property: colour");
    }

    #[test]
    fn test_bug_macro() {
        let err = fails_contract().unwrap_err();
        assert!(matches!(err, StackError::Bug(_)));
        assert!(err.to_string().starts_with("Bug detected: unreachable branch"));
    }
}
