//! Error types for the pipeline board
//!
//! Only the layers below the engine produce errors: storage, (de)serialization
//! and configuration. Board operations report through [`crate::Outcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage, persistence and configuration
pub type Result<T> = std::result::Result<T, LeadsError>;

/// Errors that can occur below the board engine
#[derive(Debug, Error)]
pub enum LeadsError {
    /// A card id appears in more than one column, or twice in one column
    #[error("card '{id}' is placed more than once")]
    DuplicatePlacement { id: String },

    /// A card record exists but no column references it
    #[error("card '{id}' is not placed in any column")]
    OrphanedCard { id: String },

    /// A column references a card with no record
    #[error("column '{column}' references unknown card '{id}'")]
    DanglingReference { column: String, id: String },

    /// Two columns share an id
    #[error("duplicate column id: {id}")]
    DuplicateColumn { id: String },

    /// Card map key and record id disagree
    #[error("card keyed as '{key}' carries id '{id}'")]
    MismatchedCardKey { key: String, id: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Lock is held by another writer
    #[error("lock busy - another write in progress at {path}")]
    LockBusy { path: PathBuf },

    /// Configuration could not be extracted
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Storage backend reported a failure
    #[error("storage error: {message}")]
    Storage { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error (builtin seed data)
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl LeadsError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy { .. })
    }
}

impl From<figment::Error> for LeadsError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LeadsError::DanglingReference {
            column: "new".into(),
            id: "abc123".into(),
        };
        assert_eq!(err.to_string(), "column 'new' references unknown card 'abc123'");
    }

    #[test]
    fn test_invalid_value() {
        let err = LeadsError::invalid_value("value", "must be non-negative");
        assert!(err.to_string().contains("must be non-negative"));
    }

    #[test]
    fn test_retryable() {
        assert!(LeadsError::LockBusy {
            path: PathBuf::from("/tmp/x.lock")
        }
        .is_retryable());
        assert!(!LeadsError::OrphanedCard { id: "x".into() }.is_retryable());
    }
}
