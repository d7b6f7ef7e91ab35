//! Form handlers: render the page and run the pipeline on submit
//!
//! Author: hephaex@gmail.com

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tner_extractor::PipelineRequest;

use crate::error::AppError;
use crate::page;
use crate::state::AppState;

/// Submitted form fields; unchecked checkboxes are absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunForm {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub write_json: Option<String>,
    #[serde(default)]
    pub json_dir: String,
    #[serde(default)]
    pub write_html: Option<String>,
    #[serde(default)]
    pub html_dir: String,
    #[serde(default)]
    pub title: String,
}

impl RunForm {
    /// Form pre-filled from configuration
    pub fn from_state(state: &AppState) -> Self {
        let output = &state.config.output;
        let dir = |d: &Option<PathBuf>| d.as_ref().map(|p| p.display().to_string());

        Self {
            source: String::new(),
            write_json: dir(&output.json_dir).map(|_| "on".to_string()),
            json_dir: dir(&output.json_dir).unwrap_or_default(),
            write_html: dir(&output.html_dir).map(|_| "on".to_string()),
            html_dir: dir(&output.html_dir).unwrap_or_default(),
            title: output.html_title.clone(),
        }
    }

    pub fn json_enabled(&self) -> bool {
        self.write_json.is_some()
    }

    pub fn html_enabled(&self) -> bool {
        self.write_html.is_some()
    }

    /// Validate the fields and build a pipeline request
    pub fn to_request(&self) -> Result<PipelineRequest, AppError> {
        let source = self.source.trim();
        if source.is_empty() {
            return Err(AppError::MissingField("source file".to_string()));
        }

        let mut request = PipelineRequest::new(source);
        if self.json_enabled() {
            let dir = self.json_dir.trim();
            if dir.is_empty() {
                return Err(AppError::MissingField("JSON output folder".to_string()));
            }
            request = request.with_json_dir(dir);
        }
        if self.html_enabled() {
            let dir = self.html_dir.trim();
            if dir.is_empty() {
                return Err(AppError::MissingField("HTML output folder".to_string()));
            }
            request = request.with_html_dir(dir);
        }
        if !self.title.trim().is_empty() {
            request = request.with_title(self.title.trim());
        }

        Ok(request)
    }
}

/// Show the form and the current output pane
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let lines = state.output_lines().await;
    Html(page::render_page(&RunForm::from_state(&state), &lines, None))
}

/// Handle a submit: validate, run the pipeline, append to the output pane
pub async fn run(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RunForm>,
) -> impl IntoResponse {
    let request = match form.to_request() {
        Ok(request) => request,
        Err(err) => {
            // Popup only; the pane is left untouched
            tracing::warn!(error = %err.log_line(), "Rejected submit");
            let lines = state.output_lines().await;
            let html = page::render_page(&form, &lines, err.popup().as_deref());
            return (err.status(), Html(html));
        }
    };

    // Held across the run so submits are processed one at a time
    let mut pane = state.output_pane.lock().await;

    let worker = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || worker.pipeline.run(&request))
        .await
        .map_err(AppError::from)
        .and_then(|result| result.map_err(AppError::from));

    let status = match result {
        Ok(report) => {
            let run = state.increment_runs();
            tracing::info!(run, run_id = %report.run_id, entities = report.document.ents.len(), "Run complete");
            pane.push(format!(
                "[{}] {}",
                report.started_at.format("%H:%M:%S"),
                report.input.display()
            ));
            pane.extend(report.log);
            StatusCode::OK
        }
        Err(err) => {
            tracing::error!(error = %err.log_line(), "Run failed");
            pane.push(err.log_line());
            err.status()
        }
    };

    let html = page::render_page(&form, &pane, None);
    (status, Html(html))
}

/// Output pane as JSON
#[derive(Debug, Serialize)]
pub struct OutputResponse {
    pub lines: Vec<String>,
    pub runs: u64,
}

pub async fn output(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(OutputResponse {
        lines: state.output_lines().await,
        runs: state.get_run_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_is_missing_field() {
        let form = RunForm {
            source: "   ".to_string(),
            ..Default::default()
        };
        let err = form.to_request().unwrap_err();
        assert_eq!(err.popup().as_deref(), Some("Please select a source file"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_enabled_output_needs_folder() {
        let form = RunForm {
            source: "letter.xml".to_string(),
            write_html: Some("on".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            form.to_request(),
            Err(AppError::MissingField(field)) if field == "HTML output folder"
        ));
    }

    #[test]
    fn test_unchecked_outputs_are_skipped() {
        let form = RunForm {
            source: "letter.xml".to_string(),
            json_dir: "out".to_string(),
            title: "Letter 152".to_string(),
            ..Default::default()
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.input, PathBuf::from("letter.xml"));
        assert!(request.json_dir.is_none());
        assert!(request.html_dir.is_none());
        assert_eq!(request.title.as_deref(), Some("Letter 152"));
    }
}
