//! somalogic-qc - check routines for SomaLogic datasets
//!
//! Command-line interface for batch quality-control of annotated matrices.

use clap::{Parser, Subcommand, ValueEnum};
use somalogic_qc::data::TsvReader;
use somalogic_qc::error::Result;
use somalogic_qc::pipeline::{discover_files, run_batch, BatchOutcome, QcConfig, TracingReporter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Log verbosity
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Check routines for SomaLogic datasets
#[derive(Parser)]
#[command(name = "somalogic-qc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log file (default: stderr)
    #[arg(long, global = true, value_name = "PATH")]
    logfile: Option<PathBuf>,

    /// Logger level; RUST_LOG takes precedence when set
    #[arg(long, global = true, value_enum, default_value = "info")]
    loglevel: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every dataset found under a directory
    Check {
        /// Path where datasets are
        #[arg(long, value_name = "PATH")]
        data_path: PathBuf,

        /// File extension of datasets
        #[arg(long, default_value = ".tsv")]
        ext: String,

        /// QC configuration YAML (field names, thresholds)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Row field holding the external sample identifier (e.g. SsfExtId)
        #[arg(long)]
        external_id_field: Option<String>,

        /// Target whose reference statistics are reported in full
        #[arg(long)]
        calibration_target: Option<String>,

        /// Reference sample types (comma-separated, e.g. "Buffer,QC")
        #[arg(long, value_delimiter = ',')]
        reference: Option<Vec<String>>,

        /// Output format for the reports
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file for the reports (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the default QC configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "qc.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.logfile.as_deref(), cli.loglevel) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Check {
            data_path,
            ext,
            config,
            external_id_field,
            calibration_target,
            reference,
            format,
            output,
        } => load_config(config.as_deref()).and_then(|mut qc| {
            if let Some(field) = external_id_field {
                qc.external_id_field = field;
            }
            if calibration_target.is_some() {
                qc.calibration_target = calibration_target;
            }
            if let Some(types) = reference {
                qc.reference_sample_types = types;
            }
            qc.validate()?;
            cmd_check(&data_path, &ext, &qc, format, output.as_deref())
        }),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(logfile: Option<&Path>, level: LogLevel) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    let (writer, ansi) = match logfile {
        Some(path) => (BoxMakeWriter::new(Mutex::new(File::create(path)?)), false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<QcConfig> {
    match path {
        Some(path) => {
            info!("Loading QC configuration from {}", path.display());
            QcConfig::from_yaml(&std::fs::read_to_string(path)?)
        }
        None => Ok(QcConfig::default()),
    }
}

/// Check all datasets under a directory
fn cmd_check(
    data_path: &Path,
    ext: &str,
    config: &QcConfig,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    info!("Somalogic datasets check started");

    let paths = discover_files(data_path, ext)?;
    let mut reporter = TracingReporter;
    let outcome = run_batch(&paths, &TsvReader::new(), config, &mut reporter);

    info!(
        "{} datasets checked, {} failed",
        outcome.reports.len(),
        outcome.failures.len()
    );

    let rendered = render(&outcome, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!("Reports written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn render(outcome: &BatchOutcome, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(outcome)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(outcome)?,
        OutputFormat::Text => {
            let mut text = String::new();
            for report in &outcome.reports {
                text.push_str(&report.to_string());
                text.push('\n');
            }
            for failure in &outcome.failures {
                text.push_str(&format!("FAILED {}: {}\n", failure.path.display(), failure.error));
            }
            text
        }
    })
}

/// Generate an example QC configuration
fn cmd_example(output: &Path) -> Result<()> {
    let yaml = QcConfig::default().to_yaml()?;
    std::fs::write(output, yaml)?;
    eprintln!("Example configuration written to {}", output.display());
    Ok(())
}
