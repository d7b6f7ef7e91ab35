//! tner Core - Shared types, errors and configuration
//!
//! This crate defines the abstractions shared by every tner crate:
//! - The workspace error type
//! - Entity span model written to JSON output
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, InputConfig, LoggingConfig, NerConfig, OutputConfig, UiConfig,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for tner operations
#[derive(Error, Debug)]
pub enum TnerError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Failed to read input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Failed to write output {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, TnerError>;

// ============================================================================
// Entity Spans
// ============================================================================

/// A recognized entity as it appears in serialized output.
///
/// `start` and `end` are character offsets into the document text, so
/// consumers can slice the `text` field of the JSON output directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
}

impl EntitySpan {
    pub fn new(start: usize, end: usize, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            text: text.into(),
        }
    }

    /// Number of characters covered by the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Log line shown for this entity in the output pane
    pub fn log_line(&self) -> String {
        format!("{}: {}", self.text, self.label)
    }
}

impl std::fmt::Display for EntitySpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}..{}]", self.log_line(), self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_span_log_line() {
        let span = EntitySpan::new(0, 12, "PERSON", "John Henslow");
        assert_eq!(span.log_line(), "John Henslow: PERSON");
        assert_eq!(span.len(), 12);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_entity_span_serialization() {
        let span = EntitySpan::new(5, 11, "GPE", "London");
        let json = serde_json::to_value(&span).unwrap();

        assert_eq!(json["start"], 5);
        assert_eq!(json["end"], 11);
        assert_eq!(json["label"], "GPE");
        assert_eq!(json["text"], "London");
    }

    #[test]
    fn test_error_from_config_error() {
        let err: TnerError = ConfigError::InvalidValue {
            key: "TNER_UI_PORT".to_string(),
            value: "http".to_string(),
        }
        .into();
        assert!(err.to_string().contains("TNER_UI_PORT"));
    }
}
