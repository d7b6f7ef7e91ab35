//! tner Configuration Management
//!
//! Handles configuration from environment variables and TOML config files,
//! with defaults that reproduce the behaviour of a plain run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Title used for the HTML visualization when none is configured
pub const DEFAULT_HTML_TITLE: &str =
    "Letter from William Christy, Jr., to John Henslow, 26 February 1831";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Transcription lookup settings
    pub input: InputConfig,

    /// Entity recognizer settings
    pub ner: NerConfig,

    /// Output writers
    pub output: OutputConfig,

    /// Form UI server
    pub ui: UiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Input
        if let Some(attr) = lookup("TNER_SELECTOR_ATTRIBUTE") {
            self.input.selector_attribute = attr;
        }
        if let Some(value) = lookup("TNER_SELECTOR_VALUE") {
            self.input.selector_value = value;
        }

        // NER
        if let Some(path) = lookup("TNER_GAZETTEER") {
            self.ner.gazetteer_path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup("TNER_MIN_CONFIDENCE") {
            let threshold: f32 = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TNER_MIN_CONFIDENCE".to_string(),
                value: value.clone(),
            })?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::InvalidValue {
                    key: "TNER_MIN_CONFIDENCE".to_string(),
                    value,
                });
            }
            self.ner.min_confidence = threshold;
        }

        // Output
        if let Some(dir) = lookup("TNER_JSON_DIR") {
            self.output.json_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup("TNER_HTML_DIR") {
            self.output.html_dir = Some(PathBuf::from(dir));
        }
        if let Some(title) = lookup("TNER_HTML_TITLE") {
            self.output.html_title = title;
        }

        // UI
        if let Some(host) = lookup("TNER_UI_HOST") {
            self.ui.host = host;
        }
        if let Some(port) = lookup("TNER_UI_PORT") {
            self.ui.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TNER_UI_PORT".to_string(),
                value: port,
            })?;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("LOG_JSON") {
            self.logging.json_format = matches!(json.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        Ok(self)
    }
}

/// Where the transcription lives inside a TEI document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Attribute name identifying the transcription element
    pub selector_attribute: String,

    /// Attribute value identifying the transcription element
    pub selector_value: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            selector_attribute: "type".to_string(),
            selector_value: "transcription".to_string(),
        }
    }
}

/// Entity recognizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    /// Optional gazetteer file (TOML or JSON) extending the built-in dictionary
    pub gazetteer_path: Option<PathBuf>,

    /// Drop candidates scoring below this
    pub min_confidence: f32,

    /// Enable the capitalized-name heuristic for PERSON
    pub name_heuristic: bool,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            gazetteer_path: None,
            min_confidence: 0.5,
            name_heuristic: true,
        }
    }
}

/// Output writer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Folder for the JSON entity file (disabled when unset)
    pub json_dir: Option<PathBuf>,

    /// Folder for the HTML visualization (disabled when unset)
    pub html_dir: Option<PathBuf>,

    /// File name of the JSON output
    pub json_file_name: String,

    /// File name of the HTML output
    pub html_file_name: String,

    /// Heading shown on the HTML page
    pub html_title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_dir: None,
            html_dir: None,
            json_file_name: "ents.json".to_string(),
            html_file_name: "ent_viz.html".to_string(),
            html_title: DEFAULT_HTML_TITLE.to_string(),
        }
    }
}

/// Form UI server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            // Local only: the form accepts filesystem paths
            host: "127.0.0.1".to_string(),
            port: 5173,
        }
    }
}

impl UiConfig {
    /// Socket address string for binding
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
