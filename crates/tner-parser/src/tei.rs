//! TEI-XML letter parser using quick-xml
//!
//! Streams the document once, capturing the text content of the first
//! element that carries the transcription attribute and the header title.

use std::path::Path;

use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{
    normalize_transcription, DocumentParser, FileType, LetterMetadata, ParsedLetter, ParserError,
    Result,
};

/// Attribute name/value pair identifying the transcription element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSelector {
    pub attribute: String,
    pub value: String,
}

impl ElementSelector {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Check whether an element carries the selector attribute.
    ///
    /// Attribute names are compared by local name, so `tei:type` matches `type`.
    fn matches(&self, element: &BytesStart<'_>, position: u64) -> Result<bool> {
        for attr in element.attributes() {
            let attr = attr.map_err(|e| malformed(position, e))?;
            if attr.key.local_name().as_ref() != self.attribute.as_bytes() {
                continue;
            }
            let value = attr.unescape_value().map_err(|e| malformed(position, e))?;
            if value == self.value {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Default for ElementSelector {
    fn default() -> Self {
        Self::new("type", "transcription")
    }
}

/// Result of a single pass over a TEI document
#[derive(Debug, Default)]
struct TeiScan {
    transcription: Option<String>,
    metadata: LetterMetadata,
}

/// Text being collected for an open element
struct Capture {
    depth: usize,
    text: String,
}

impl Capture {
    fn at(depth: usize) -> Self {
        Self {
            depth,
            text: String::new(),
        }
    }
}

fn malformed(position: u64, err: impl std::fmt::Display) -> ParserError {
    ParserError::MalformedXml {
        position,
        message: err.to_string(),
    }
}

/// Open elements are exactly `TEI > teiHeader > fileDesc > titleStmt`
fn in_title_stmt(stack: &[Vec<u8>]) -> bool {
    const PATH: [&[u8]; 3] = [b"teiHeader", b"fileDesc", b"titleStmt"];
    stack.len() == PATH.len() + 1
        && stack[1..]
            .iter()
            .zip(PATH)
            .all(|(open, name)| open.as_slice() == name)
}

fn document_language(element: &BytesStart<'_>) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"xml:lang")
        .and_then(|attr| attr.unescape_value().ok())
        .map(|v| v.into_owned())
}

fn scan(xml: &str, selector: &ElementSelector) -> Result<TeiScan> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut result = TeiScan::default();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut transcription: Option<Capture> = None;
    let mut title: Option<Capture> = None;

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if stack.is_empty() {
                    result.metadata.language = document_language(&e);
                }
                let name = e.local_name().as_ref().to_vec();

                if result.transcription.is_none()
                    && transcription.is_none()
                    && selector.matches(&e, position)?
                {
                    transcription = Some(Capture::at(stack.len()));
                }
                if result.metadata.title.is_none()
                    && title.is_none()
                    && name.as_slice() == b"title"
                    && in_title_stmt(&stack)
                {
                    title = Some(Capture::at(stack.len()));
                }

                stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                if stack.is_empty() {
                    result.metadata.language = document_language(&e);
                }
                if result.transcription.is_none()
                    && transcription.is_none()
                    && selector.matches(&e, position)?
                {
                    result.transcription = Some(String::new());
                }
            }
            Ok(Event::End(_)) => {
                stack.pop();
                let depth = stack.len();

                if transcription.as_ref().is_some_and(|c| c.depth == depth) {
                    result.transcription = transcription.take().map(|c| c.text);
                }
                if title.as_ref().is_some_and(|c| c.depth == depth) {
                    result.metadata.title = title
                        .take()
                        .map(|c| c.text.split_whitespace().collect::<Vec<_>>().join(" "))
                        .filter(|t| !t.is_empty());
                }
            }
            Ok(Event::Text(t)) => {
                if transcription.is_none() && title.is_none() {
                    continue;
                }
                // HTML named entities (`&mdash;`) show up in TEI exports without a DTD
                let text = t
                    .unescape_with(resolve_html5_entity)
                    .map_err(|e| malformed(position, e))?;
                for capture in [transcription.as_mut(), title.as_mut()].into_iter().flatten() {
                    capture.text.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if transcription.is_none() && title.is_none() {
                    continue;
                }
                let text = std::str::from_utf8(&c)
                    .map_err(|e| ParserError::EncodingError(e.to_string()))?;
                for capture in [transcription.as_mut(), title.as_mut()].into_iter().flatten() {
                    capture.text.push_str(text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(reader.buffer_position() as u64, e)),
            Ok(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(
            reader.buffer_position() as u64,
            format!(
                "unexpected end of document, <{}> is not closed",
                String::from_utf8_lossy(open)
            ),
        ));
    }

    Ok(result)
}

/// Extract the normalized transcription using the default selector
/// (`type="transcription"`).
pub fn extract_transcription(xml: &str) -> Result<String> {
    TeiParser::default().extract(xml)
}

/// TEI-XML letter parser
pub struct TeiParser {
    selector: ElementSelector,
}

impl TeiParser {
    /// Create a parser looking up the transcription with `selector`
    pub fn new(selector: ElementSelector) -> Self {
        Self { selector }
    }

    /// Text content of the first matching element, normalized
    pub fn extract(&self, xml: &str) -> Result<String> {
        self.parse_str(xml, "<memory>").map(|letter| letter.content)
    }

    /// Parse an in-memory TEI document
    pub fn parse_str(&self, xml: &str, file_path: &str) -> Result<ParsedLetter> {
        let scan = scan(xml, &self.selector)?;

        let transcription =
            scan.transcription
                .ok_or_else(|| ParserError::TranscriptionNotFound {
                    attribute: self.selector.attribute.clone(),
                    value: self.selector.value.clone(),
                })?;

        tracing::debug!(
            file = file_path,
            chars = transcription.chars().count(),
            title = ?scan.metadata.title,
            "Extracted transcription"
        );

        Ok(ParsedLetter::new(file_path, FileType::TeiXml)
            .with_content(normalize_transcription(&transcription))
            .with_metadata(scan.metadata))
    }
}

impl Default for TeiParser {
    fn default() -> Self {
        Self::new(ElementSelector::default())
    }
}

impl DocumentParser for TeiParser {
    fn parse(&self, path: &Path) -> Result<ParsedLetter> {
        let xml = std::fs::read_to_string(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        self.parse_str(&xml, &path.display().to_string())
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::TeiXml]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0" xml:lang="en">
  <teiHeader>
    <fileDesc>
      <titleStmt>
        <title>Letter from William Christy, Jr.,
          to John Henslow</title>
      </titleStmt>
    </fileDesc>
  </teiHeader>
  <text>
    <body>
      <div type="abstract"><p>Summary &amp; notes</p></div>
      <div type="transcription"><p>My dear Sir, I went to <placeName>London</placeName> &amp; saw Mr. Sowerby.</p></div>
      <div type="transcription"><p>Second copy</p></div>
    </body>
  </text>
</TEI>"#;

    #[test]
    fn test_extracts_first_transcription() {
        let text = extract_transcription(LETTER).unwrap();
        assert_eq!(
            text,
            "My dear Sir, I went to London and saw Mr. Sowerby."
        );
    }

    #[test]
    fn test_header_metadata() {
        let letter = TeiParser::default().parse_str(LETTER, "letters_152.xml").unwrap();
        assert_eq!(
            letter.metadata.title.as_deref(),
            Some("Letter from William Christy, Jr., to John Henslow")
        );
        assert_eq!(letter.metadata.language.as_deref(), Some("en"));
        assert_eq!(letter.file_type, FileType::TeiXml);
    }

    #[test]
    fn test_custom_selector() {
        let parser = TeiParser::new(ElementSelector::new("type", "abstract"));
        assert_eq!(parser.extract(LETTER).unwrap(), "Summary and notes");
    }

    #[test]
    fn test_preserves_whitespace_and_cdata() {
        let xml = "<TEI><div type=\"transcription\">\n  Line one\n  <![CDATA[Salt & pepper]]>\n</div></TEI>";
        let text = extract_transcription(xml).unwrap();
        assert_eq!(text, "\n  Line one\n  Salt and pepper\n");
    }

    #[test]
    fn test_empty_transcription_element() {
        let xml = r#"<TEI><div type="transcription"/></TEI>"#;
        assert_eq!(extract_transcription(xml).unwrap(), "");
    }

    #[test]
    fn test_prefixed_attribute_matches() {
        let xml = r#"<TEI xmlns:tei="urn:tei"><div tei:type="transcription">Hi</div></TEI>"#;
        assert_eq!(extract_transcription(xml).unwrap(), "Hi");
    }

    #[test]
    fn test_missing_transcription() {
        let xml = r#"<TEI><div type="summary">Hi</div></TEI>"#;
        let result = extract_transcription(xml);
        assert!(matches!(
            result,
            Err(ParserError::TranscriptionNotFound { .. })
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<TEI><div type="transcription">Hi</p></TEI>"#;
        assert!(matches!(
            extract_transcription(xml),
            Err(ParserError::MalformedXml { .. })
        ));

        let unclosed = r#"<TEI><div type="transcription">Hi"#;
        assert!(matches!(
            extract_transcription(unclosed),
            Err(ParserError::MalformedXml { .. })
        ));
    }

    #[test]
    fn test_html_named_entities() {
        let xml = r#"<TEI><div type="transcription">Cambridge &mdash; Thursday &amp; Friday&nbsp;&#x2014;</div></TEI>"#;
        assert_eq!(
            extract_transcription(xml).unwrap(),
            "Cambridge \u{2014} Thursday and Friday\u{a0}\u{2014}"
        );

        let unknown = r#"<TEI><div type="transcription">A &notanentity; B</div></TEI>"#;
        assert!(matches!(
            extract_transcription(unknown),
            Err(ParserError::MalformedXml { .. })
        ));
    }

    #[test]
    fn test_title_only_from_file_desc() {
        let xml = r#"<TEI>
  <teiHeader>
    <fileDesc>
      <sourceDesc>
        <bibl><titleStmt><title>Calendar entry</title></titleStmt></bibl>
      </sourceDesc>
      <titleStmt><title>Letter from William Christy, Jr.</title></titleStmt>
    </fileDesc>
  </teiHeader>
  <text><body><div type="transcription">Hi</div></body></text>
</TEI>"#;
        let letter = TeiParser::default().parse_str(xml, "letter.xml").unwrap();
        assert_eq!(
            letter.metadata.title.as_deref(),
            Some("Letter from William Christy, Jr.")
        );
    }

    #[test]
    fn test_parse_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letters_152.xml");
        std::fs::write(&path, LETTER).unwrap();

        let letter = TeiParser::default().parse(&path).unwrap();
        assert!(letter.content.contains("London and saw"));
    }
}
