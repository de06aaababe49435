//! CLI entry point for the gradebook export job.
//!
//! Runs the export once and exits. Meant to be triggered by an external
//! scheduler; every option can also be supplied through the environment or
//! a `.env` file.

use anyhow::{Result, bail};
use chrono::Local;
use clap::Parser;
use gradebook_export::{
    config::ExportConfig, export::run_export, infra::snapshot::Snapshot,
    services::Collaborators,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gradebook_export")]
#[command(about = "Export gradebook assessments and scores for an early-alert system", long_about = None)]
struct Cli {
    /// Path or URL of the platform snapshot to read
    #[arg(long, env = "STARFISH_SNAPSHOT")]
    snapshot: String,

    /// Terms to export, comma separated (defaults to the active terms)
    #[arg(long = "term", env = "STARFISH_EXPORT_TERM", value_delimiter = ',')]
    terms: Vec<String>,

    /// Directory receiving assessments.txt and scores.txt
    #[arg(long, env = "STARFISH_EXPORT_PATH")]
    output_dir: Option<PathBuf>,

    /// Export one scope per provider section instead of per site
    #[arg(long, env = "STARFISH_USE_PROVIDER", default_value_t = false)]
    use_provider: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/gradebook_export.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gradebook_export.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = ExportConfig::new(cli.terms, cli.output_dir, cli.use_provider);
    let run_started = Local::now().naive_local();

    let snapshot = Snapshot::load(&cli.snapshot)?;
    let report = run_export(Collaborators::from_backend(&snapshot), &config, run_started)?;

    info!(
        terms = ?report.terms,
        exported = report.sites.exported,
        skipped = report.sites.skipped,
        failed = report.sites.failed,
        "Run complete"
    );

    if let Err(e) = &report.assessments {
        bail!("assessment export failed: {e}");
    }
    if let Err(e) = &report.scores {
        bail!("score export failed: {e}");
    }

    Ok(())
}
