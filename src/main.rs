//! CLI entry point for the Rt tracker.
//!
//! Provides subcommands for running the estimation pipeline on a local or
//! remote dataset and for the daily update flow with its freshness cache.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use rt_tracker::cache::DatasetCache;
use rt_tracker::fetch::{BasicClient, fetch_bytes};
use rt_tracker::output::{append_snapshot, format_report, print_json, write_records};
use rt_tracker::parser::{ParseOptions, parse_dataset};
use rt_tracker::rt::{RtConfig, RtEstimator};
use rt_tracker::stats::DailySnapshot;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "rt_tracker")]
#[command(about = "Estimates the effective reproduction number from daily case counts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every pipeline invocation.
#[derive(Args)]
struct PipelineArgs {
    /// CSV file to write per-date Rt records to
    #[arg(short, long, default_value = "rt.csv")]
    output: String,

    /// CSV file to append the daily indicator snapshot to
    #[arg(long, default_value = "indicators.csv")]
    snapshot_output: String,

    /// Header of the date column
    #[arg(long, default_value = "date")]
    date_column: String,

    /// Header of the cumulative case-count column
    #[arg(long, default_value = "total_cases")]
    cases_column: String,

    /// Header of the cumulative test-count column
    #[arg(long, default_value = "total_tests")]
    tests_column: String,

    /// Population used for the cases-per-100k indicator
    #[arg(long, default_value_t = 14_570_000)]
    population: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the estimation pipeline on a dataset from a file or URL
    Estimate {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Fetch today's dataset through the freshness cache, then estimate
    Update {
        /// Dataset URL (falls back to the RT_DATA_URL env var)
        #[arg(long)]
        url: Option<String>,

        /// Directory for the cached dataset and its date stamp
        #[arg(long, default_value = ".cache")]
        cache_dir: String,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/rt_tracker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("rt_tracker.log"));

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

    match cli.command {
        Commands::Estimate { source, pipeline } => {
            let body = fetcher(&source).await?;
            run_pipeline(&body, &pipeline)?;
        }
        Commands::Update {
            url,
            cache_dir,
            pipeline,
        } => {
            let url = match url {
                Some(url) => url,
                None => std::env::var("RT_DATA_URL")
                    .context("pass --url or set RT_DATA_URL")?,
            };
            let body = fetch_with_cache(&url, &cache_dir).await?;
            run_pipeline(&body, &pipeline)?;
        }
    }

    Ok(())
}

/// Loads the dataset from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %source))]
async fn fetcher(source: &String) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("reading {source}"))?
    };
    Ok(bytes)
}

/// Returns today's dataset, fetching only when the cache stamp is stale.
#[tracing::instrument(skip(url), fields(cache_dir))]
async fn fetch_with_cache(url: &str, cache_dir: &str) -> Result<Vec<u8>> {
    let cache = DatasetCache::new(cache_dir);
    let today = Utc::now().date_naive().to_string();

    if cache.is_fresh(&today) {
        info!(date = %today, "cache is fresh, skipping fetch");
        return cache.load();
    }

    info!(date = %today, "cache stale, requesting new data");
    let client = BasicClient::new();
    let body = fetch_bytes(&client, url).await?;
    cache.store(&today, &body)?;

    Ok(body)
}

/// Parses, estimates, and writes every output for one dataset body.
fn run_pipeline(body: &[u8], args: &PipelineArgs) -> Result<()> {
    let options = ParseOptions {
        date_column: args.date_column.clone(),
        cases_column: args.cases_column.clone(),
        tests_column: args.tests_column.clone(),
    };
    let dataset = parse_dataset(body, &options)?;
    info!(
        rows = dataset.cases.len(),
        has_tests = dataset.tests.is_some(),
        "dataset parsed"
    );

    let estimator = RtEstimator::new(RtConfig::default());
    let outcome = estimator.estimate(&dataset.cases)?;
    debug!(
        records = outcome.records.len(),
        log_likelihood = outcome.log_likelihood,
        "estimation finished"
    );

    write_records(&args.output, &outcome.records)?;

    let snapshot = DailySnapshot::from_series(
        &dataset.cases,
        dataset.tests.as_ref(),
        args.population,
    );
    if let Some(ref snap) = snapshot {
        append_snapshot(&args.snapshot_output, snap)?;
        print_json(snap)?;
    }

    print!("{}", format_report(snapshot.as_ref(), &outcome, 70));
    info!(output = %args.output, "run complete");

    Ok(())
}
