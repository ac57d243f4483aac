//! CLI entry point for the ONS energy-balance tool.
//!
//! Provides subcommands for summarizing one subsystem, listing the
//! subsystems present in the dataset, and refreshing the local copy of
//! the raw CSV.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ons_balance::balance::BalanceSummary;
use ons_balance::cache::{DATASET_URL, DEFAULT_CACHE_PATH, DatasetSource, Session};
use ons_balance::catalog;
use ons_balance::fetch::BasicClient;
use ons_balance::output::{self, SummaryRecord};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ons_balance")]
#[command(about = "Energy balance per ONS subsystem", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize generation, load, and exchange for one subsystem
    Summary {
        /// Subsystem code (NE, SE, N, S, SIN); defaults to the first code
        /// present in the dataset
        #[arg(value_name = "CODE")]
        subsystem: Option<String>,

        /// Dataset URL or local CSV path
        #[arg(short, long, default_value = DATASET_URL)]
        source: String,

        /// Local path for the cached raw CSV
        #[arg(long, default_value = DEFAULT_CACHE_PATH)]
        cache: String,

        /// Re-download even if a cached copy exists
        #[arg(long, default_value_t = false)]
        refresh: bool,

        /// CSV file to append the summary to
        #[arg(short, long)]
        output: Option<String>,

        /// Print the summary as JSON instead of tables
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the subsystem codes present in the dataset
    List {
        /// Dataset URL or local CSV path
        #[arg(short, long, default_value = DATASET_URL)]
        source: String,

        /// Local path for the cached raw CSV
        #[arg(long, default_value = DEFAULT_CACHE_PATH)]
        cache: String,
    },
    /// Re-download the dataset, overwriting the local copy
    Refresh {
        /// Dataset URL or local CSV path
        #[arg(short, long, default_value = DATASET_URL)]
        source: String,

        /// Local path for the cached raw CSV
        #[arg(long, default_value = DEFAULT_CACHE_PATH)]
        cache: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ons_balance.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ons_balance.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let client = BasicClient::new();

    match cli.command {
        Commands::Summary {
            subsystem,
            source,
            cache,
            refresh,
            output,
            json,
        } => {
            let mut session = Session::new(DatasetSource::new(source, cache));
            if refresh {
                session.refresh(&client).await?;
            }
            let table = session.table(&client).await?;

            let code = match subsystem {
                Some(code) => code,
                None => table
                    .subsystems()
                    .first()
                    .map(|c| c.to_string())
                    .ok_or_else(|| anyhow::anyhow!("dataset has no rows"))?,
            };

            let summary = BalanceSummary::from_table(table, &code);
            if summary.rows_matched == 0 {
                warn!(subsystem = %code, "No rows matched this subsystem code");
            }
            info!(
                subsystem = %code,
                rows = summary.rows_matched,
                total_generation_mwh = summary.total_generation_mwh(),
                "Subsystem aggregated"
            );

            let record = SummaryRecord::new(&summary);
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", output::render_summary(&summary));
                println!("{}", output::render_mix(&summary));
                println!("{}", output::render_balance(&summary));
            }

            if let Some(path) = output {
                output::append_record(&path, &record)?;
            }
        }
        Commands::List { source, cache } => {
            let mut session = Session::new(DatasetSource::new(source, cache));
            let table = session.table(&client).await?;

            let codes = table.subsystems();
            for code in &codes {
                info!(code = %code, name = %catalog::display_name(code), "Subsystem");
            }
            info!(total = codes.len(), rows = table.len(), "Subsystem list");
        }
        Commands::Refresh { source, cache } => {
            let mut session = Session::new(DatasetSource::new(source, cache));
            let rows = session.refresh(&client).await?.len();
            info!(
                rows,
                path = %session.source().cache_path().display(),
                "Dataset refreshed"
            );
        }
    }

    Ok(())
}
