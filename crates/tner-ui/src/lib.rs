//! Local form UI for the letter NER pipeline
//!
//! Serves a single page with a source field, JSON/HTML output toggles and
//! an output pane. Submitting runs the pipeline and appends its log lines.
//!
//! Author: hephaex@gmail.com

pub mod error;
pub mod handlers;
pub mod page;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tner_core::AppConfig;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::ui_routes())
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until shutdown
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.ui.addr();
    let state = Arc::new(AppState::new(config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Letter NER UI listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Letter NER UI stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
