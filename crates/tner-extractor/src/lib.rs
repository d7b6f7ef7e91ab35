//! tner Extractor - Named entity recognition pipeline
//!
//! Runs a rule and dictionary based recognizer over letter transcriptions,
//! builds an annotated document and writes it as JSON and/or an HTML
//! entity visualization.

use tner_core::Result;

/// Extracted entity from text
///
/// `start` and `end` are byte offsets into the recognized text.
#[derive(Debug, Clone)]
pub struct ExtractedEntity {
    pub text: String,
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f32,
}

impl ExtractedEntity {
    /// Whether two entities share at least one byte
    pub fn overlaps(&self, other: &ExtractedEntity) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Trait for entity extractors
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<Vec<ExtractedEntity>>;
}

pub mod doc;
pub mod gazetteer;
pub mod ner;
pub mod output;
pub mod pipeline;
pub mod tokenizer;

pub use doc::AnnotatedDoc;
pub use gazetteer::{Gazetteer, GazetteerEntry};
pub use ner::{EntityLabel, RuleBasedNer};
pub use pipeline::{Pipeline, PipelineReport, PipelineRequest};
