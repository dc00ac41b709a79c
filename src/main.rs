//! CLI entry point for the turtle survey cleaner.
//!
//! `clean` runs the pipeline and writes the cleaned-record and site-summary
//! tables; `sync` does the same and then pushes both files to the remote
//! spreadsheet service and, optionally, an S3 archive.

mod infra;
mod services;

use crate::infra::s3::S3Archive;
use crate::infra::sheets::{SheetsClient, SheetsCredentials};
use crate::services::export_sink::ExportSink;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use turtle_survey::pipeline::{PipelinePaths, run};

#[derive(Parser)]
#[command(name = "turtle_survey")]
#[command(about = "Clean turtle capture records and summarize survey sites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PathArgs {
    /// Delimited-text export of the survey spreadsheet
    #[arg(short, long, default_value = "./raw-data/March82021.csv")]
    source: PathBuf,

    /// Directory the output tables are written to
    #[arg(short, long, default_value = "./clean-data/")]
    target_dir: PathBuf,

    /// File stem (and remote spreadsheet name) of the cleaned-record table
    #[arg(long, default_value = "March82021_CLEANED")]
    cleaned_name: String,

    /// File stem (and remote spreadsheet name) of the site-summary table
    #[arg(long, default_value = "sites")]
    sites_name: String,
}

impl PathArgs {
    fn pipeline_paths(&self) -> PipelinePaths {
        PipelinePaths::new(
            &self.source,
            &self.target_dir,
            &self.cleaned_name,
            &self.sites_name,
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the source table and write the local output files
    Clean {
        #[command(flatten)]
        paths: PathArgs,
    },
    /// Clean, then publish both output files to the remote sinks
    Sync {
        #[command(flatten)]
        paths: PathArgs,

        /// Skip the spreadsheet import
        #[arg(long, default_value_t = false)]
        no_sheets: bool,

        /// Optional: S3 bucket to archive the output files in
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Optional: Gzip compress files before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/turtle_survey.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("turtle_survey.log"));

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

    match cli.command {
        Commands::Clean { paths } => {
            run(&paths.pipeline_paths())?;
        }
        Commands::Sync {
            paths,
            no_sheets,
            s3_bucket,
            gzip,
        } => {
            let pipeline_paths = paths.pipeline_paths();
            run(&pipeline_paths)?;

            let mut sinks: Vec<Box<dyn ExportSink>> = Vec::new();
            if no_sheets {
                info!("Spreadsheet import disabled, skipping");
            } else {
                let credentials = SheetsCredentials::from_env()?;
                sinks.push(Box::new(SheetsClient::new(&credentials).await?));
            }
            if let Some(bucket) = s3_bucket {
                info!(bucket = %bucket, gzip, "S3 archive enabled");
                sinks.push(Box::new(S3Archive::from_env(bucket, gzip).await));
            }

            let artifacts = [
                (paths.cleaned_name.as_str(), pipeline_paths.cleaned.as_path()),
                (paths.sites_name.as_str(), pipeline_paths.sites.as_path()),
            ];
            publish_all(&sinks, &artifacts).await?;
        }
    }

    Ok(())
}

/// Pushes every artifact to every sink. A failed upload is logged and the
/// remaining uploads still run; the command fails at the end if any did.
#[tracing::instrument(skip_all, fields(sinks = sinks.len()))]
async fn publish_all(sinks: &[Box<dyn ExportSink>], artifacts: &[(&str, &Path)]) -> Result<()> {
    let mut failures = 0usize;

    for sink in sinks {
        for (name, path) in artifacts {
            if let Err(e) = sink.publish(name, path).await {
                failures += 1;
                error!(sink = sink.label(), artifact = %name, error = %e, "Publish failed");
            } else {
                info!(sink = sink.label(), artifact = %name, "Published");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} upload(s) failed; local files are up to date");
    }
    Ok(())
}
