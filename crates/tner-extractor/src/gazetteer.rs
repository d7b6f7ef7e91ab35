//! Gazetteer files
//!
//! A gazetteer extends the recognizer's dictionary with project-specific
//! terms (correspondents, collectors, localities). Files are TOML or JSON,
//! chosen by extension:
//!
//! ```toml
//! [[entries]]
//! term = "John Stevens Henslow"
//! label = "PERSON"
//! aliases = ["Henslow", "J. S. Henslow"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ner::EntityLabel;
use tner_core::{Result, TnerError};

/// A known term and its label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub term: String,
    pub label: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Collection of gazetteer entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gazetteer {
    #[serde(default)]
    pub entries: Vec<GazetteerEntry>,
}

impl Gazetteer {
    /// Load from a `.toml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TnerError::Model(format!("Cannot read gazetteer {}: {e}", path.display()))
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(TnerError::Model(format!(
                "Unsupported gazetteer format: {}",
                other.unwrap_or("none")
            ))),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let gazetteer: Self = toml::from_str(content)
            .map_err(|e| TnerError::Model(format!("Invalid gazetteer: {e}")))?;
        gazetteer.validate()?;
        Ok(gazetteer)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let gazetteer: Self = serde_json::from_str(content)
            .map_err(|e| TnerError::Model(format!("Invalid gazetteer: {e}")))?;
        gazetteer.validate()?;
        Ok(gazetteer)
    }

    /// Every entry needs a term and a known label
    fn validate(&self) -> Result<()> {
        for entry in &self.entries {
            if entry.term.trim().is_empty() {
                return Err(TnerError::Model("Gazetteer entry with empty term".to_string()));
            }
            entry.label.parse::<EntityLabel>()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
