//! UI error handling
//!
//! Author: hephaex@gmail.com

use axum::http::StatusCode;
use tner_core::TnerError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// A required form field is empty; shown as a popup
    MissingField(String),
    /// The pipeline failed for this input
    Pipeline(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message for the popup, if this error is shown as one
    pub fn popup(&self) -> Option<String> {
        match self {
            AppError::MissingField(field) => Some(format!("Please select a {field}")),
            _ => None,
        }
    }

    /// Line appended to the output pane
    pub fn log_line(&self) -> String {
        match self {
            AppError::MissingField(field) => format!("Missing {field}"),
            AppError::Pipeline(msg) => format!("Error: {msg}"),
            AppError::Internal(msg) => format!("Internal error: {msg}"),
        }
    }
}

impl From<TnerError> for AppError {
    fn from(err: TnerError) -> Self {
        match err {
            TnerError::MissingField(field) => AppError::MissingField(field),
            other => AppError::Pipeline(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}
