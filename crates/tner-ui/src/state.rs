//! Application state management
//!
//! Author: hephaex@gmail.com

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tner_core::{AppConfig, Result};
use tner_extractor::Pipeline;
use tokio::sync::Mutex;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Extraction/recognition pipeline
    pub pipeline: Pipeline,
    /// Server start time
    pub start_time: Instant,
    /// Completed pipeline runs
    pub run_count: AtomicU64,
    /// Output pane lines; held for the duration of a run so runs never interleave
    pub output_pane: Mutex<Vec<String>>,
}

impl AppState {
    /// Create new application state with config
    pub fn new(config: AppConfig) -> Result<Self> {
        let pipeline = Pipeline::from_config(&config)?;
        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Create state around an existing pipeline
    pub fn with_pipeline(config: AppConfig, pipeline: Pipeline) -> Self {
        Self {
            config,
            pipeline,
            start_time: Instant::now(),
            run_count: AtomicU64::new(0),
            output_pane: Mutex::new(Vec::new()),
        }
    }

    /// Increment run counter
    pub fn increment_runs(&self) -> u64 {
        self.run_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get total run count
    pub fn get_run_count(&self) -> u64 {
        self.run_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Snapshot of the output pane
    pub async fn output_lines(&self) -> Vec<String> {
        self.output_pane.lock().await.clone()
    }
}
