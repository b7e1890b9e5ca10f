//! CLI entry point for the station traffic tool.
//!
//! Loads stations and trips from files or URLs, then computes per-station
//! traffic for one time filter, for a sweep across the day, or for filter
//! values replayed from stdin the way the slider pushes them.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use station_traffic::error::TrafficError;
use station_traffic::fetch::{BasicClient, read_source};
use station_traffic::output::{append_record, print_json, write_snapshot_csv};
use station_traffic::parser::{parse_stations, parse_trips};
use station_traffic::stats::FilterSummary;
use station_traffic::time::{MINUTES_PER_DAY, TimeFilter};
use station_traffic::traffic::{TrafficEngine, WindowRadius};
use std::ffi::OsStr;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "station_traffic")]
#[command(about = "Bike-share station traffic by time of day", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// Station JSON file or URL
    #[arg(short, long)]
    stations: String,

    /// Trip CSV file or URL (".gz" is decompressed)
    #[arg(short, long)]
    trips: String,

    /// Minutes on each side of the selected time
    #[arg(short, long, default_value_t = 60)]
    radius: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute station traffic for one time filter
    Snapshot {
        #[command(flatten)]
        data: DataArgs,

        /// "-1" or "any" for all trips, a minute of day, or HH:MM
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        time: TimeFilter,

        /// CSV file to write station rows to
        #[arg(short, long)]
        output: Option<String>,

        /// Log the snapshot as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summarize traffic for every step across the day
    Sweep {
        #[command(flatten)]
        data: DataArgs,

        /// Minutes between sampled filter values
        #[arg(long, default_value_t = 60)]
        step: u16,

        /// CSV file to append summaries to
        #[arg(short, long, default_value = "sweep.csv")]
        output: String,
    },
    /// Read filter values from stdin, one per line, and summarize each
    Replay {
        #[command(flatten)]
        data: DataArgs,

        /// Optional: CSV file to append summaries to
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/station_traffic.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("station_traffic.log"));

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
        Commands::Snapshot {
            data,
            time,
            output,
            json,
        } => {
            let mut engine = load_engine(&data).await?;
            if let Err(e) = engine.apply(time) {
                warn!(error = %e, "Keeping previous snapshot");
            }
            let snapshot = engine.snapshot();

            info!(summary = ?FilterSummary::from_snapshot(snapshot), "Snapshot computed");

            if let Some(path) = output {
                write_snapshot_csv(&path, snapshot)?;
            }
            if json {
                print_json(snapshot)?;
            }
        }
        Commands::Sweep { data, step, output } => {
            let engine = load_engine(&data).await?;
            sweep(&engine, step, &output)?;
        }
        Commands::Replay { data, output } => {
            let mut engine = load_engine(&data).await?;
            replay(&mut engine, output.as_deref()).await?;
        }
    }

    Ok(())
}

/// Loads stations and trips concurrently and builds the engine.
#[tracing::instrument(skip_all, fields(stations = %data.stations, trips = %data.trips))]
async fn load_engine(data: &DataArgs) -> Result<TrafficEngine> {
    let radius = WindowRadius::new(data.radius)?;
    let client = BasicClient::new();

    let (station_bytes, trip_bytes) = tokio::try_join!(
        read_source(&client, &data.stations),
        read_source(&client, &data.trips),
    )?;

    let stations = parse_stations(&station_bytes)?;
    let trips = parse_trips(&trip_bytes)?;
    info!(
        stations = stations.len(),
        trips = trips.len(),
        "Loaded stations and trips"
    );

    Ok(TrafficEngine::new(stations, trips, radius))
}

/// Appends one summary row per `step` minutes, starting at midnight.
#[tracing::instrument(skip(engine))]
fn sweep(engine: &TrafficEngine, step: u16, output: &str) -> Result<()> {
    if engine.index().is_empty() {
        warn!("No trips data available for filtering");
        let summary = FilterSummary::from_error("no_trips", &TrafficError::NoTrips.to_string());
        return append_record(output, &summary);
    }

    let step = step.max(1);
    let mut rows = 0;
    for minute in (0..MINUTES_PER_DAY).step_by(step as usize) {
        let filter = TimeFilter::from_control(minute.into())?;
        let summary = FilterSummary::from_snapshot(&engine.compute(filter));
        append_record(output, &summary)?;
        rows += 1;
    }

    info!(rows, output, "Sweep complete");
    Ok(())
}

/// Applies each filter value read from stdin; bad lines are logged and skipped.
async fn replay(engine: &mut TrafficEngine, output: Option<&str>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let summary = match line.parse::<TimeFilter>() {
            Ok(filter) => match engine.apply(filter) {
                Ok(snapshot) => FilterSummary::from_snapshot(snapshot),
                Err(e) => {
                    warn!(error = %e, filter = %filter, "Keeping previous snapshot");
                    FilterSummary::from_error("no_trips", &e.to_string())
                        .with_filter(filter.to_control(), &filter.to_string())
                }
            },
            Err(e) => {
                warn!(error = %e, input = %line.trim(), "Ignoring filter value");
                FilterSummary::from_error("invalid_filter", &e.to_string())
            }
        };

        info!(
            filter = summary.time_filter,
            label = %summary.label,
            departures = summary.departures,
            arrivals = summary.arrivals,
            active_stations = summary.active_stations,
            busiest = summary.busiest_station.as_deref().unwrap_or("-"),
            "Filter applied"
        );

        if let Some(path) = output {
            append_record(path, &summary)?;
        }
    }

    Ok(())
}
