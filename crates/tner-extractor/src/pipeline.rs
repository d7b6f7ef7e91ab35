//! Pipeline runner
//!
//! read file → extract transcription → recognize entities →
//! optional JSON → optional HTML → log lines

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::doc::AnnotatedDoc;
use crate::ner::RuleBasedNer;
use crate::{output, EntityExtractor};
use tner_core::{AppConfig, OutputConfig, Result, TnerError};
use tner_parser::{ElementSelector, ParsedLetter, ParserRegistry};

/// A single run: input file plus the enabled outputs
#[derive(Debug, Clone, Default)]
pub struct PipelineRequest {
    /// Source letter
    pub input: PathBuf,
    /// Folder for the JSON output; JSON is skipped when `None`
    pub json_dir: Option<PathBuf>,
    /// Folder for the HTML output; HTML is skipped when `None`
    pub html_dir: Option<PathBuf>,
    /// Overrides the configured HTML title
    pub title: Option<String>,
}

impl PipelineRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn with_json_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.json_dir = Some(dir.into());
        self
    }

    pub fn with_html_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.html_dir = Some(dir.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Outcome of a run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub input: PathBuf,
    pub document: AnnotatedDoc,
    pub json_path: Option<PathBuf>,
    pub html_path: Option<PathBuf>,
    /// Entity lines followed by one line per written file
    pub log: Vec<String>,
}

/// Extraction, recognition and output writing for letter files
pub struct Pipeline {
    parsers: ParserRegistry,
    ner: Box<dyn EntityExtractor>,
    output: OutputConfig,
}

impl Pipeline {
    /// Create a pipeline from its parts
    pub fn new<E: EntityExtractor + 'static>(
        parsers: ParserRegistry,
        ner: E,
        output: OutputConfig,
    ) -> Self {
        Self {
            parsers,
            ner: Box::new(ner),
            output,
        }
    }

    /// Build parsers and recognizer from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let selector = ElementSelector::new(
            config.input.selector_attribute.clone(),
            config.input.selector_value.clone(),
        );
        let ner = RuleBasedNer::from_config(&config.ner)?;

        Ok(Self::new(
            ParserRegistry::with_defaults(selector),
            ner,
            config.output.clone(),
        ))
    }

    pub fn output_config(&self) -> &OutputConfig {
        &self.output
    }

    /// Read and normalize the transcription of a letter
    pub fn extract_text(&self, path: &Path) -> Result<ParsedLetter> {
        Ok(self.parsers.parse(path)?)
    }

    /// Run the recognizer over `text`
    pub fn recognize(&self, text: &str) -> Result<AnnotatedDoc> {
        let entities = self.ner.extract(text)?;
        Ok(AnnotatedDoc::new(text, &entities))
    }

    /// Run the whole pipeline for one request
    pub fn run(&self, request: &PipelineRequest) -> Result<PipelineReport> {
        if request.input.as_os_str().is_empty() {
            return Err(TnerError::MissingField("source file".to_string()));
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = tracing::info_span!("pipeline", %run_id, input = %request.input.display());
        let _guard = span.enter();

        let letter = self.extract_text(&request.input)?;
        tracing::info!(
            chars = letter.char_count(),
            words = letter.word_count(),
            "Extracted transcription"
        );

        let title = request
            .title
            .clone()
            .unwrap_or_else(|| self.output.html_title.clone());
        let document = self.recognize(&letter.content)?.with_title(title);

        let mut log = document.log_lines();
        for line in &log {
            tracing::debug!("{line}");
        }
        tracing::info!(
            entities = document.ents.len(),
            labels = ?document.label_counts(),
            "Recognized entities"
        );

        let json_path = match &request.json_dir {
            Some(dir) => {
                let path = dir.join(&self.output.json_file_name);
                output::write_json(&document, &path)?;
                log.push(format!("JSON written to {}", path.display()));
                Some(path)
            }
            None => None,
        };

        let html_path = match &request.html_dir {
            Some(dir) => {
                let path = dir.join(&self.output.html_file_name);
                output::write_html(&document, &path)?;
                log.push(format!("HTML written to {}", path.display()));
                Some(path)
            }
            None => None,
        };

        Ok(PipelineReport {
            run_id,
            started_at,
            input: request.input.clone(),
            document,
            json_path,
            html_path,
            log,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(
            ParserRegistry::default(),
            RuleBasedNer::new(),
            OutputConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractedEntity;

    struct FixedExtractor;

    impl EntityExtractor for FixedExtractor {
        fn extract(&self, text: &str) -> Result<Vec<ExtractedEntity>> {
            Ok(text
                .find("Cambridge")
                .map(|start| ExtractedEntity {
                    text: "Cambridge".to_string(),
                    entity_type: "GPE".to_string(),
                    start,
                    end: start + "Cambridge".len(),
                    confidence: 1.0,
                })
                .into_iter()
                .collect())
        }
    }

    fn write_letter(dir: &Path) -> PathBuf {
        let path = dir.join("letter.xml");
        std::fs::write(
            &path,
            r#"<TEI><text><div type="transcription">Sent from Cambridge &amp; home</div></text></TEI>"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_empty_input_is_missing_field() {
        let pipeline = Pipeline::default();
        let result = pipeline.run(&PipelineRequest::default());
        assert!(matches!(result, Err(TnerError::MissingField(_))));
    }

    #[test]
    fn test_run_without_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_letter(dir.path());
        let pipeline = Pipeline::new(
            ParserRegistry::default(),
            FixedExtractor,
            OutputConfig::default(),
        );

        let report = pipeline.run(&PipelineRequest::new(&input)).unwrap();

        assert_eq!(report.document.text, "Sent from Cambridge and home");
        assert_eq!(report.log, vec!["Cambridge: GPE"]);
        assert!(report.json_path.is_none());
        assert!(report.html_path.is_none());
    }

    #[test]
    fn test_run_with_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_letter(dir.path());
        let pipeline = Pipeline::new(
            ParserRegistry::default(),
            FixedExtractor,
            OutputConfig::default(),
        );

        let request = PipelineRequest::new(&input)
            .with_json_dir(dir.path().join("json"))
            .with_html_dir(dir.path().join("html"))
            .with_title("Letter 152");
        let report = pipeline.run(&request).unwrap();

        let json_path = report.json_path.unwrap();
        assert_eq!(json_path, dir.path().join("json").join("ents.json"));
        assert!(json_path.exists());

        let html = std::fs::read_to_string(report.html_path.unwrap()).unwrap();
        assert!(html.contains("Letter 152"));
        assert_eq!(report.log.len(), 3);
    }

    #[test]
    fn test_missing_input_file() {
        let pipeline = Pipeline::default();
        let result = pipeline.run(&PipelineRequest::new("/nonexistent/letters_152.xml"));
        assert!(matches!(result, Err(TnerError::Input { .. })));
    }
}
