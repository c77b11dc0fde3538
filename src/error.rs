use thiserror::Error;

use crate::conditions::ConditionError;
use crate::options::SwitchError;
use crate::params::PersistenceError;
use crate::value::ValueError;

/// Error types for the agrovar-rs library.
#[derive(Error, Debug)]
pub enum AgrovarError {
    /// Error raised by the value-type registry or one of its converters.
    #[error("Value error: {0}")]
    Value(#[from] ValueError),

    /// Error raised by a configuration switch or an options resolver.
    #[error("Switch error: {0}")]
    Switch(#[from] SwitchError),

    /// Error raised by the condition engine.
    #[error("Condition error: {0}")]
    Condition(#[from] ConditionError),

    /// Error raised while loading or saving a parameters set.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for agrovar-rs operations.
pub type Result<T> = std::result::Result<T, AgrovarError>;

impl From<String> for AgrovarError {
    fn from(s: String) -> Self {
        AgrovarError::Other(s)
    }
}

impl From<&str> for AgrovarError {
    fn from(s: &str) -> Self {
        AgrovarError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgrovarError::Other("something went wrong".to_string());
        assert!(format!("{}", err).contains("something went wrong"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AgrovarError = io_err.into();

        match err {
            AgrovarError::Io(_) => (),
            _ => panic!("Expected Io variant"),
        }

        let str_err: AgrovarError = "test error".into();
        match str_err {
            AgrovarError::Other(s) => assert_eq!(s, "test error"),
            _ => panic!("Expected Other variant"),
        }
    }
}
