//! Error types for the stylesheet engine.
//!
//! Compiling never fails: decoding problems are recovered where they happen
//! (logged and skipped). The types here are what reaches a caller of the
//! mutation API, the persistence layer, or the engine constructors.

use std::path::PathBuf;

use thiserror::Error;

/// A required input was missing or malformed. Nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid '{field}': {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::new(field, "is required")
    }
}

/// A catalog file or persisted structure failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse {source_name}: {message}")]
pub struct ParseError {
    pub source_name: String,
    pub message: String,
}

impl ParseError {
    pub fn new(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }
}

/// Writing to the option store failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to persist '{key}': {message}")]
pub struct PersistenceError {
    pub key: String,
    pub message: String,
}

impl PersistenceError {
    pub fn new(key: impl Into<String>, message: impl ToString) -> Self {
        Self {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

/// Failure of a mutation entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors from setting up an engine: configuration and catalog I/O.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::missing("hexcode");
        assert_eq!(err.to_string(), "invalid 'hexcode': is required");
    }

    #[test]
    fn test_mutation_error_is_transparent() {
        let err: MutationError = PersistenceError::new("user_css", "disk full").into();
        let msg = err.to_string();
        assert!(msg.contains("user_css"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_engine_io_error_names_path() {
        let err = EngineError::io(
            "/tmp/missing.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        );
        assert!(err.to_string().contains("/tmp/missing.yaml"));
    }
}
