//! Route definitions
//!
//! Author: hephaex@gmail.com

use crate::handlers::{form, health};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Form page and the submit endpoint
pub fn ui_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(form::index))
        .route("/run", post(form::run))
}

/// Machine-readable endpoints
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/output", get(form::output))
}
