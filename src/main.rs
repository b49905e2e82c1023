//! CLI entry point for the swing grader.
//!
//! Provides subcommands for decoding vendor exports, computing graded
//! session metrics, maintaining the session store, and building reports.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use swing_grader::analyzers::analyzer::build_report;
use swing_grader::{
    config::Config,
    output::{append_records, print_json, print_pretty},
    parser::decode_export,
    records::SwingInstrumentType,
    source::{BasicClient, load_export},
    stats::SessionMetrics,
    store::{JsonStore, Player, Session, SessionStore},
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "swing_grader")]
#[command(about = "Decode swing sensor exports and grade sessions against level benchmarks", long_about = None)]
struct Cli {
    /// JSON store file (overrides SWING_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a vendor export and report row counts
    Decode {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(short, long, value_enum)]
        instrument: SwingInstrumentType,

        /// CSV file to append decoded records to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Decode a vendor export and print graded session metrics
    Metrics {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(short, long, value_enum)]
        instrument: SwingInstrumentType,

        /// Benchmark level, e.g. "High School" or "College"
        #[arg(short, long, default_value = "High School")]
        level: String,
    },
    /// Add or update a player in the store
    AddPlayer {
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        level: String,
    },
    /// Register a session for a player
    AddSession {
        #[arg(long)]
        id: String,

        #[arg(long)]
        player_id: String,

        /// Session date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        #[arg(short, long, value_enum)]
        instrument: SwingInstrumentType,
    },
    /// Decode an export and insert its records into a session
    Ingest {
        #[arg(long)]
        session: String,

        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
    /// Print the report for a session
    Report {
        #[arg(long)]
        session: String,
    },
    /// List benchmark levels
    Levels,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let config = Config::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("swing_grader.log"));

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
    let store_path = cli.store.unwrap_or_else(|| config.store_path.clone());
    let client = BasicClient::new();

    match cli.command {
        Commands::Decode {
            source,
            instrument,
            output,
        } => {
            let bytes = load_export(&client, &source).await?;
            let decoded = decode_export(&bytes, instrument)?;
            print_pretty(&decoded.records);
            print_json(&decoded.summary)?;

            if let Some(output) = output {
                append_records(&output, &decoded.records)?;
            }
        }
        Commands::Metrics {
            source,
            instrument,
            level,
        } => {
            let benchmarks = config.benchmarks()?;
            let bytes = load_export(&client, &source).await?;
            let decoded = decode_export(&bytes, instrument)?;
            let metrics =
                SessionMetrics::from_records(&decoded.records, benchmarks.for_level(&level))?;
            print_json(&metrics)?;
        }
        Commands::AddPlayer { id, name, level } => {
            let mut store = JsonStore::load(&store_path)?;
            info!(player_id = %id, level = %level, "Adding player");
            store.add_player(Player { id, name, level });
            store.save(&store_path)?;
        }
        Commands::AddSession {
            id,
            player_id,
            date,
            instrument,
        } => {
            let mut store = JsonStore::load(&store_path)?;
            info!(session_id = %id, player_id = %player_id, %instrument, "Adding session");
            store.add_session(Session {
                id,
                player_id,
                date,
                instrument,
            })?;
            store.save(&store_path)?;
        }
        Commands::Ingest { session, source } => {
            let mut store = JsonStore::load(&store_path)?;
            let instrument = store
                .session(&session)
                .map(|s| s.instrument)
                .with_context(|| format!("unknown session {}", session))?;

            let bytes = load_export(&client, &source).await?;
            let decoded = decode_export(&bytes, instrument)?;
            let inserted = store.insert_records(&session, decoded.records)?;
            store.save(&store_path)?;

            info!(session_id = %session, inserted, "Export ingested");
            print_json(&decoded.summary)?;
        }
        Commands::Report { session } => {
            let benchmarks = config.benchmarks()?;
            let store = JsonStore::load(&store_path)?;
            let report = build_report(&store, &benchmarks, &session)?;
            print_json(&report)?;
        }
        Commands::Levels => {
            let benchmarks = config.benchmarks()?;
            for level in benchmarks.levels() {
                println!("{}", level);
            }
        }
    }

    Ok(())
}
