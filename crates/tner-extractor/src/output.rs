//! Output writers
//!
//! - JSON: the `ents` subset of the document's serialized form
//! - HTML: inline entity visualization page

use std::path::Path;

use serde_json::{Map, Value};

use crate::doc::AnnotatedDoc;
use crate::tokenizer::OffsetMap;
use tner_core::config::DEFAULT_HTML_TITLE;
use tner_core::{Result, TnerError};

// ============================================================================
// JSON
// ============================================================================

/// Keep only the `ents` key of a serialized document
pub fn ents_subset(doc_json: &Value) -> Value {
    let ents: Map<String, Value> = doc_json
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(key, _)| key.as_str() == "ents")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();

    Value::Object(ents)
}

/// Write `{"ents": [...]}` to `path`
pub fn write_json(doc: &AnnotatedDoc, path: &Path) -> Result<()> {
    let payload = serde_json::to_string_pretty(&ents_subset(&doc.to_json()))?;
    write_file(path, payload.as_bytes())?;

    tracing::info!(path = %path.display(), entities = doc.ents.len(), "Wrote entity JSON");
    Ok(())
}

// ============================================================================
// HTML
// ============================================================================

const PAGE_STYLE: &str = "font-size: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; padding: 4rem 2rem; direction: ltr";
const MARK_STYLE: &str =
    "padding: 0.45em 0.6em; margin: 0 0.25em; line-height: 1; border-radius: 0.35em;";
const LABEL_STYLE: &str = "font-size: 0.8em; font-weight: bold; line-height: 1; border-radius: 0.35em; vertical-align: middle; margin-left: 0.5rem";

/// Background colour for a label
pub fn label_color(label: &str) -> &'static str {
    match label {
        "ORG" => "#7aecec",
        "PRODUCT" => "#bfeeb7",
        "GPE" => "#feca74",
        "LOC" => "#ff9561",
        "PERSON" => "#aa9cfc",
        "NORP" => "#c887fb",
        "FAC" => "#9cc9cc",
        "EVENT" => "#ffeb80",
        "LAW" | "LANGUAGE" => "#ff8197",
        "WORK_OF_ART" => "#f0d0ff",
        "DATE" | "TIME" => "#bfe1d9",
        "MONEY" | "QUANTITY" | "ORDINAL" | "CARDINAL" | "PERCENT" => "#e4e7d2",
        _ => "#ddd",
    }
}

/// Escape text for HTML element and attribute content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escaped text with newlines rendered as line breaks
fn push_text(html: &mut String, text: &str) {
    let mut lines = text.split('\n');
    if let Some(first) = lines.next() {
        html.push_str(&escape_html(first));
    }
    for line in lines {
        html.push_str("<br>\n");
        html.push_str(&escape_html(line));
    }
}

/// Render the inline entity markup for a document
pub fn render_entities(doc: &AnnotatedDoc) -> String {
    let offsets = OffsetMap::new(&doc.text);
    let mut html = String::new();
    let mut cursor = 0;

    for span in &doc.ents {
        let start = offsets.to_byte(span.start);
        let end = offsets.to_byte(span.end);
        if start < cursor || end <= start {
            tracing::warn!(entity = %span, "Skipping overlapping or empty span");
            continue;
        }

        push_text(&mut html, &doc.text[cursor..start]);
        html.push_str(&format!(
            "<mark class=\"entity\" style=\"background: {}; {MARK_STYLE}\">",
            label_color(&span.label)
        ));
        push_text(&mut html, &doc.text[start..end]);
        html.push_str(&format!(
            "<span style=\"{LABEL_STYLE}\">{}</span></mark>",
            escape_html(&span.label)
        ));
        cursor = end;
    }
    push_text(&mut html, &doc.text[cursor..]);

    html
}

/// Render a full HTML page with the document title as heading
pub fn render_html(doc: &AnnotatedDoc) -> String {
    let title = escape_html(doc.title.as_deref().unwrap_or(DEFAULT_HTML_TITLE));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body style="{PAGE_STYLE}">
<figure style="margin-bottom: 6rem">
<h2 style="margin: 0">{title}</h2>
<div class="entities" style="line-height: 2.5; direction: ltr">{body}</div>
</figure>
</body>
</html>
"#,
        body = render_entities(doc)
    )
}

/// Write the visualization page to `path`
pub fn write_html(doc: &AnnotatedDoc, path: &Path) -> Result<()> {
    write_file(path, render_html(doc).as_bytes())?;

    tracing::info!(path = %path.display(), "Wrote entity visualization");
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let to_output_error = |source| TnerError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_output_error)?;
    }
    std::fs::write(path, contents).map_err(to_output_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractedEntity;

    fn sample_doc() -> AnnotatedDoc {
        let text = "Dear Henslow,\nI reached London & Paris.";
        let london = text.find("London").unwrap();
        AnnotatedDoc::new(
            text,
            &[ExtractedEntity {
                text: "London".to_string(),
                entity_type: "GPE".to_string(),
                start: london,
                end: london + 6,
                confidence: 0.95,
            }],
        )
    }

    #[test]
    fn test_ents_subset_keeps_only_ents() {
        let doc = sample_doc();
        let subset = ents_subset(&doc.to_json());
        let obj = subset.as_object().unwrap();

        assert_eq!(obj.len(), 1);
        assert_eq!(obj["ents"], doc.to_json()["ents"]);
        assert_eq!(ents_subset(&Value::Null), Value::Object(Map::new()));
    }

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ents.json");
        write_json(&sample_doc(), &path).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let keys: Vec<&String> = written.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["ents"]);
        assert_eq!(written["ents"][0]["text"], "London");
    }

    #[test]
    fn test_render_marks_and_escapes() {
        let html = render_entities(&sample_doc());

        assert!(html.starts_with("Dear Henslow,<br>\nI reached "));
        assert!(html.contains("background: #feca74"));
        assert!(html.contains(">London<span"));
        assert!(html.contains("GPE</span></mark>"));
        assert!(html.ends_with(" &amp; Paris."));
    }

    #[test]
    fn test_html_page_title() {
        let page = render_html(&sample_doc());
        assert!(page.contains(DEFAULT_HTML_TITLE));

        let custom = render_html(&sample_doc().with_title("Letter <152>"));
        assert!(custom.contains("<h2 style=\"margin: 0\">Letter &lt;152&gt;</h2>"));
    }

    #[test]
    fn test_write_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ent_viz.html");
        write_html(&sample_doc(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.is_empty());
        assert!(contents.contains(DEFAULT_HTML_TITLE));
    }

    #[test]
    fn test_label_colors() {
        assert_eq!(label_color("PERSON"), "#aa9cfc");
        assert_eq!(label_color("SPECIES"), "#ddd");
    }
}
