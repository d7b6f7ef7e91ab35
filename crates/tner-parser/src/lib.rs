//! tner Parser - Transcription extraction from letter files
//!
//! Supports parsing of:
//! - TEI-XML letters (transcription element located by attribute)
//! - Plain text files (whole file is the transcription)
//!
//! Each parser implements the `DocumentParser` trait and produces
//! a `ParsedLetter` whose content is ready for entity recognition.

use std::path::Path;
use thiserror::Error;
use tner_core::TnerError;

pub mod tei;

pub use tei::{extract_transcription, ElementSelector, TeiParser};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during letter parsing
#[derive(Error, Debug)]
pub enum ParserError {
    /// File format is not supported
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// XML is not well formed
    #[error("Malformed XML at byte {position}: {message}")]
    MalformedXml { position: u64, message: String },

    /// No element carries the transcription attribute
    #[error("No element with {attribute}=\"{value}\" found")]
    TranscriptionNotFound { attribute: String, value: String },

    /// Encoding error
    #[error("Text encoding error: {0}")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, ParserError>;

impl From<ParserError> for TnerError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::IoError { path, source } => TnerError::Input {
                path: path.into(),
                source,
            },
            other => TnerError::Extraction(other.to_string()),
        }
    }
}

// ============================================================================
// Parsed Letter Types
// ============================================================================

/// A parsed letter with its normalized transcription
#[derive(Debug, Clone)]
pub struct ParsedLetter {
    /// Source file path
    pub file_path: String,

    /// Detected file type
    pub file_type: FileType,

    /// Normalized transcription text
    pub content: String,

    /// Metadata extracted from the document header
    pub metadata: LetterMetadata,
}

impl ParsedLetter {
    /// Create a new parsed letter
    pub fn new(file_path: impl Into<String>, file_type: FileType) -> Self {
        Self {
            file_path: file_path.into(),
            file_type,
            content: String::new(),
            metadata: LetterMetadata::default(),
        }
    }

    /// Set content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set metadata
    pub fn with_metadata(mut self, metadata: LetterMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Get total word count (approximate)
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// Supported file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    TeiXml,
    PlainText,
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "xml" | "tei" => Self::TeiXml,
            "txt" => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TeiXml => write!(f, "tei"),
            Self::PlainText => write!(f, "text"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Metadata extracted during parsing
#[derive(Debug, Clone, Default)]
pub struct LetterMetadata {
    /// Title from the TEI header
    pub title: Option<String>,

    /// Language declared on the document (`xml:lang`)
    pub language: Option<String>,
}

// ============================================================================
// Normalization
// ============================================================================

/// Apply the fixed substitutions to an extracted transcription.
///
/// Every `"& "` becomes `"and "`.
pub fn normalize_transcription(text: &str) -> String {
    text.replace("& ", "and ")
}

// ============================================================================
// Parser Trait
// ============================================================================

/// Trait for letter parsers
pub trait DocumentParser: Send + Sync {
    /// Parse a letter from a file path
    fn parse(&self, path: &Path) -> Result<ParsedLetter>;

    /// Get supported file types
    fn supported_types(&self) -> &[FileType];

    /// Check if this parser can handle a file type
    fn can_parse(&self, file_type: FileType) -> bool {
        self.supported_types().contains(&file_type)
    }
}

// ============================================================================
// Parser Registry
// ============================================================================

/// Registry of available parsers
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DocumentParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Registry with the TEI parser for `selector` and the plain text parser
    pub fn with_defaults(selector: ElementSelector) -> Self {
        let mut registry = Self::new();
        registry.register(TeiParser::new(selector));
        registry.register(PlainTextParser);
        registry
    }

    /// Register a parser
    pub fn register<P: DocumentParser + 'static>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    /// Find a parser for a file type
    pub fn find_parser(&self, file_type: FileType) -> Option<&dyn DocumentParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(file_type))
            .map(|p| p.as_ref())
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path) -> Result<ParsedLetter> {
        let file_type = FileType::from_path(path);

        if file_type == FileType::Unknown {
            return Err(ParserError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none")
                    .to_string(),
            ));
        }

        let parser = self
            .find_parser(file_type)
            .ok_or_else(|| ParserError::UnsupportedFormat(file_type.to_string()))?;

        parser.parse(path)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults(ElementSelector::default())
    }
}

// ============================================================================
// Plain Text
// ============================================================================

/// Plain text parser
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn parse(&self, path: &Path) -> Result<ParsedLetter> {
        let content = std::fs::read_to_string(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(
            ParsedLetter::new(path.display().to_string(), FileType::PlainText)
                .with_content(normalize_transcription(&content)),
        )
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::PlainText]
    }
}

// ============================================================================
// Tests
// ============================================================================
