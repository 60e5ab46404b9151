//! Binary entry point for the remap CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Remap a source tree into a sibling directory
//! remap transform --source src/main/java --target build/remapped --mappings joined.srg
//!
//! # Preview without writing, as JSON
//! remap transform --source src --target out --mappings joined.srg --dry-run --format json
//!
//! # Validate a mapping file
//! remap check --mappings joined.srg
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use remap::cli::{check_summary, run_check, run_transform, transform_summary, TransformOptions};
use remap_core::error::{OutputErrorCode, RemapError};
use remap_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Rename Java classes, fields and methods from an SRG mapping table.
#[derive(Parser, Debug)]
#[command(
    name = "remap",
    version,
    about = "Rename Java classes, fields and methods from an SRG mapping table"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output (overridden by RUST_LOG).
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text summary (default).
    #[default]
    Text,
    /// Full JSON response.
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite every Java file under --source into --target.
    Transform {
        /// Root of the Java source tree.
        #[arg(long)]
        source: PathBuf,
        /// Output directory; must exist and must not be inside --source.
        #[arg(long)]
        target: PathBuf,
        /// SRG mapping file.
        #[arg(long)]
        mappings: PathBuf,
        /// Glob of source-relative paths to leave out (repeatable).
        #[arg(long = "exclude", value_name = "GLOB")]
        excludes: Vec<String>,
        /// Compute renames without writing the target tree.
        #[arg(long)]
        dry_run: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Load and validate a mapping file.
    Check {
        /// SRG mapping file.
        #[arg(long)]
        mappings: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, like success responses.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), RemapError> {
    match cli.command {
        Command::Transform {
            source,
            target,
            mappings,
            excludes,
            dry_run,
            format,
        } => {
            let options = TransformOptions {
                source,
                target,
                mappings,
                excludes,
                dry_run,
            };
            let response = run_transform(&options)?;
            match format {
                OutputFormat::Json => emit(&response),
                OutputFormat::Text => print_text(&transform_summary(&response)),
            }
        }
        Command::Check { mappings, format } => {
            let response = run_check(&mappings)?;
            match format {
                OutputFormat::Json => emit(&response),
                OutputFormat::Text => print_text(&check_summary(&response)),
            }
        }
    }
}

fn emit<T: serde::Serialize>(response: &T) -> Result<(), RemapError> {
    emit_response(response, &mut io::stdout())
        .map_err(|e| RemapError::internal(format!("failed to write response: {}", e)))
}

fn print_text(text: &str) -> Result<(), RemapError> {
    let mut stdout = io::stdout();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| RemapError::internal(format!("failed to write output: {}", e)))
}

// ============================================================================
// Tests
// ============================================================================
