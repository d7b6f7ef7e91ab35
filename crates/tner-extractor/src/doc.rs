//! Annotated document produced by a recognition run

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tokenizer::{tokenize, OffsetMap, Token};
use crate::ExtractedEntity;
use tner_core::EntitySpan;

/// Text with its tokens and recognized entity spans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedDoc {
    pub text: String,
    pub tokens: Vec<Token>,
    pub ents: Vec<EntitySpan>,
    /// Heading used by the HTML renderer
    #[serde(skip)]
    pub title: Option<String>,
}

impl AnnotatedDoc {
    /// Build from recognizer output (byte offsets) over `text`
    pub fn new(text: impl Into<String>, entities: &[ExtractedEntity]) -> Self {
        let text = text.into();
        let offsets = OffsetMap::new(&text);

        let mut ents: Vec<EntitySpan> = entities
            .iter()
            .filter(|e| e.end <= text.len() && e.start < e.end)
            .map(|e| {
                EntitySpan::new(
                    offsets.to_char(e.start),
                    offsets.to_char(e.end),
                    e.entity_type.clone(),
                    e.text.clone(),
                )
            })
            .collect();
        ents.sort_by_key(|span| span.start);

        Self {
            tokens: tokenize(&text),
            text,
            ents,
            title: None,
        }
    }

    /// Set the page title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Serialized form with `text`, `ents` and `tokens` keys
    pub fn to_json(&self) -> Value {
        json!({
            "text": self.text,
            "ents": self.ents,
            "tokens": self.tokens,
        })
    }

    /// One `"{text}: {label}"` line per entity
    pub fn log_lines(&self) -> Vec<String> {
        self.ents.iter().map(EntitySpan::log_line).collect()
    }

    /// Entity count per label
    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for span in &self.ents {
            *counts.entry(span.label.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(text: &str, label: &str, start: usize) -> ExtractedEntity {
        ExtractedEntity {
            text: text.to_string(),
            entity_type: label.to_string(),
            start,
            end: start + text.len(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_offsets_are_characters() {
        let text = "Paid £5 at Bérard's in Paris";
        let paris_byte = text.find("Paris").unwrap();
        let doc = AnnotatedDoc::new(
            text,
            &[entity("£5", "MONEY", 5), entity("Paris", "GPE", paris_byte)],
        );

        assert_eq!(doc.ents[0].start, 5);
        assert_eq!(doc.ents[0].end, 7);
        let chars: Vec<char> = doc.text.chars().collect();
        let paris: String = chars[doc.ents[1].start..doc.ents[1].end].iter().collect();
        assert_eq!(paris, "Paris");
    }

    #[test]
    fn test_to_json_keys() {
        let doc = AnnotatedDoc::new("In London", &[entity("London", "GPE", 3)]);
        let json = doc.to_json();

        assert_eq!(json["text"], "In London");
        assert_eq!(json["ents"][0]["label"], "GPE");
        assert_eq!(json["ents"][0]["start"], 3);
        assert_eq!(json["tokens"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_log_lines_and_counts() {
        let doc = AnnotatedDoc::new(
            "London and Paris",
            &[entity("London", "GPE", 0), entity("Paris", "GPE", 11)],
        );

        assert_eq!(doc.log_lines(), vec!["London: GPE", "Paris: GPE"]);
        assert_eq!(doc.label_counts().get("GPE"), Some(&2));
    }

    #[test]
    fn test_out_of_range_entities_dropped() {
        let doc = AnnotatedDoc::new("short", &[entity("missing", "ORG", 10)]);
        assert!(doc.ents.is_empty());
    }
}
