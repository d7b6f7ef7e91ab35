//! tner CLI - Command-line interface
//!
//! Usage:
//!   tner extract <input> [--json-dir <dir>] [--html-dir <dir>] [--title <title>]
//!   tner text <input>
//!   tner ui [--host <host>] [--port <port>]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tner_core::{AppConfig, LoggingConfig};
use tner_extractor::{Pipeline, PipelineRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tner")]
#[command(about = "Named entity recognition for TEI-XML letters")]
#[command(version)]
struct Cli {
    /// TOML configuration file; environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize entities in a letter and write the outputs
    Extract {
        /// TEI-XML letter
        input: PathBuf,
        /// Folder for the JSON entity list
        #[arg(long)]
        json_dir: Option<PathBuf>,
        /// Folder for the HTML visualization
        #[arg(long)]
        html_dir: Option<PathBuf>,
        /// Title of the HTML page
        #[arg(long)]
        title: Option<String>,
    },
    /// Print the normalized transcription of a letter
    Text {
        /// TEI-XML letter
        input: PathBuf,
    },
    /// Start the local form UI
    Ui {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    Ok(config.with_env_override()?)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", logging.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location)
        .with_writer(std::io::stderr);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Flags win; with neither output flag the configured folders are used
fn extract_request(
    config: &AppConfig,
    input: PathBuf,
    json_dir: Option<PathBuf>,
    html_dir: Option<PathBuf>,
    title: Option<String>,
) -> PipelineRequest {
    let (json_dir, html_dir) = if json_dir.is_none() && html_dir.is_none() {
        (
            config.output.json_dir.clone(),
            config.output.html_dir.clone(),
        )
    } else {
        (json_dir, html_dir)
    };

    let mut request = PipelineRequest::new(input);
    if let Some(dir) = json_dir {
        request = request.with_json_dir(dir);
    }
    if let Some(dir) = html_dir {
        request = request.with_html_dir(dir);
    }
    if let Some(title) = title {
        request = request.with_title(title);
    }
    request
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Extract {
            input,
            json_dir,
            html_dir,
            title,
        } => {
            let pipeline = Pipeline::from_config(&config)?;
            let request = extract_request(&config, input, json_dir, html_dir, title);
            if request.json_dir.is_none() && request.html_dir.is_none() {
                tracing::warn!("No output folder given; entities are only printed");
            }

            let report = tokio::task::spawn_blocking(move || pipeline.run(&request)).await??;
            for line in &report.log {
                println!("{line}");
            }
        }
        Commands::Text { input } => {
            let pipeline = Pipeline::from_config(&config)?;
            let letter = pipeline.extract_text(&input)?;
            println!("{}", letter.content);
        }
        Commands::Ui { host, port } => {
            if let Some(host) = host {
                config.ui.host = host;
            }
            if let Some(port) = port {
                config.ui.port = port;
            }
            tner_ui::serve(config).await?;
        }
    }

    Ok(())
}
