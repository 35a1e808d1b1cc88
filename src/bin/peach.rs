//! Peach CLI - Command-line interface for Peach Flux
//!
//! Commands:
//! - parse: Split an export into its raw sections
//! - import: Build the session import bundle
//! - strokes: Print normalized stroke records
//! - averages: Per-athlete and piece averages
//! - force-curve: Periodic samples around one stroke
//! - periodic: Time-windowed, downsampled periodic series

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

use peach_flux::import::ImportOptions;
use peach_flux::normalizer::Normalizer;
use peach_flux::pipeline::FluxProcessor;
use peach_flux::types::PeriodicQuery;
use peach_flux::{ConfigOverrides, FluxConfig, FluxError, PEACH_FLUX_VERSION};

/// Peach - Rowing telemetry export analysis
#[derive(Parser)]
#[command(name = "peach")]
#[command(version = PEACH_FLUX_VERSION)]
#[command(about = "Parse and analyse PowerLine telemetry exports", long_about = None)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output (default when stdout is a terminal)
    #[arg(long, global = true)]
    pretty: bool,

    /// Section marker prefix, overrides the configuration file
    #[arg(long, global = true)]
    sentinel: Option<String>,

    /// Force-curve half window in ms, overrides the configuration file
    #[arg(long, global = true)]
    half_window_ms: Option<i64>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split an export into its raw sections
    Parse {
        /// Input file path (use - for stdin)
        input: PathBuf,
    },

    /// Build the session import bundle
    Import {
        /// Input file path (use - for stdin)
        input: PathBuf,

        /// Override the export's session name
        #[arg(long)]
        session_name: Option<String>,

        /// Print only the import summary
        #[arg(long)]
        summary: bool,
    },

    /// Print normalized stroke records
    Strokes {
        /// Input file path (use - for stdin)
        input: PathBuf,
    },

    /// Per-athlete and piece-level averages
    Averages {
        /// Input file path (use - for stdin)
        input: PathBuf,
    },

    /// Periodic samples around one stroke
    ForceCurve {
        /// Input file path (use - for stdin)
        input: PathBuf,

        /// Stroke number
        #[arg(long)]
        stroke: i64,
    },

    /// Time-windowed, downsampled periodic series
    Periodic {
        /// Input file path (use - for stdin)
        input: PathBuf,

        /// Inclusive lower bound (ms)
        #[arg(long)]
        start: Option<i64>,

        /// Inclusive upper bound (ms)
        #[arg(long)]
        end: Option<i64>,

        /// Keep every Nth sample
        #[arg(long, default_value = "1")]
        downsample: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("peach_flux={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run(cli: Cli) -> Result<(), PeachCliError> {
    let loaded = match &cli.config {
        Some(path) => FluxConfig::from_json(&fs::read_to_string(path)?)?,
        None => FluxConfig::default(),
    };
    let overrides = ConfigOverrides {
        sentinel: cli.sentinel.clone(),
        stroke_half_window_ms: cli.half_window_ms,
    };
    let processor = FluxProcessor::with_config(loaded.with_overrides(&overrides)?);
    let pretty = cli.pretty || atty::is(atty::Stream::Stdout);
    debug!(pretty, "Processor ready");

    match cli.command {
        Commands::Parse { input } => {
            let text = read_input(&input)?;
            emit(&processor.parse(&text), pretty)
        }

        Commands::Import {
            input,
            session_name,
            summary,
        } => {
            let text = read_input(&input)?;
            let options = ImportOptions {
                session_name,
                filename: upload_name(&input),
            };
            let import = processor.import(&text, &options);
            if summary {
                emit(&import.summary(), pretty)
            } else {
                emit(&import, pretty)
            }
        }

        Commands::Strokes { input } => {
            let parsed = processor.parse(&read_input(&input)?);
            emit(&Normalizer::strokes(&parsed), pretty)
        }

        Commands::Averages { input } => {
            let import = import_from(&processor, &input)?;
            emit(&processor.averages(&import.athletes, &import.strokes)?, pretty)
        }

        Commands::ForceCurve { input, stroke } => {
            let import = import_from(&processor, &input)?;
            emit(
                &processor.force_curve(&import.strokes, &import.periodic, stroke)?,
                pretty,
            )
        }

        Commands::Periodic {
            input,
            start,
            end,
            downsample,
        } => {
            let import = import_from(&processor, &input)?;
            let query = PeriodicQuery {
                start_ms: start,
                end_ms: end,
                downsample,
            };
            emit(&processor.periodic_window(&import.periodic, &query)?, pretty)
        }
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, PeachCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn upload_name(input: &Path) -> Option<String> {
    if input.to_string_lossy() == "-" {
        return None;
    }
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

fn import_from(
    processor: &FluxProcessor,
    input: &Path,
) -> Result<peach_flux::types::SessionImport, PeachCliError> {
    let text = read_input(input)?;
    let options = ImportOptions {
        filename: upload_name(input),
        ..ImportOptions::default()
    };
    Ok(processor.import(&text, &options))
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<(), PeachCliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

// Error types

#[derive(Debug)]
enum PeachCliError {
    Io(io::Error),
    Flux(FluxError),
    Json(serde_json::Error),
}

impl From<io::Error> for PeachCliError {
    fn from(e: io::Error) -> Self {
        PeachCliError::Io(e)
    }
}

impl From<FluxError> for PeachCliError {
    fn from(e: FluxError) -> Self {
        PeachCliError::Flux(e)
    }
}

impl From<serde_json::Error> for PeachCliError {
    fn from(e: serde_json::Error) -> Self {
        PeachCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<PeachCliError> for CliError {
    fn from(e: PeachCliError) -> Self {
        match e {
            PeachCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            PeachCliError::Flux(e) => {
                let (code, hint) = match &e {
                    FluxError::NoStrokeData => (
                        "NO_STROKE_DATA",
                        "Check that the export has an Aperiodic section with data rows",
                    ),
                    FluxError::StrokeNotFound(_) => {
                        ("STROKE_NOT_FOUND", "Run 'peach strokes' to list stroke numbers")
                    }
                    FluxError::NoPeriodicData => (
                        "NO_PERIODIC_DATA",
                        "Check that the export has a Periodic section with data rows",
                    ),
                    FluxError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                    FluxError::InvalidConfig(_) => {
                        ("INVALID_CONFIG", "Check the configuration file and override flags")
                    }
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            PeachCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
        }
    }
}
