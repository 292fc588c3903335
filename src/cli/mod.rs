//! CLI for the suite-runner harness
//!
//! ## Usage
//!
//! `suite-runner --sourceRoot <DIR> --dataRoot <DIR>`
//!
//! Scans `sourceRoot` for entries named `*_tests`, runs each one with its
//! working directory set to `dataRoot`, and exits 0 only if every target
//! exited 0 (or none were found).
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! The command implementation returns `CliResult<ExitCode>` instead of
//! calling `process::exit`. Only the top-level `run()` function handles
//! errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::runner::discovery::DirectoryDiscovery;
use crate::runner::interfaces::ProcessExecutor;
use crate::runner::{self, ConsoleReporter};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Sequential harness for compiled test executables
#[derive(Parser, Debug)]
#[command(name = "suite-runner")]
#[command(version = VERSION)]
#[command(about = "Discovers *_tests executables and runs them sequentially", long_about = None)]
pub struct Cli {
    /// Directory to scan for test executables
    #[arg(long = "sourceRoot", value_name = "DIR")]
    pub source_root: PathBuf,

    /// Working directory passed to every invoked test
    #[arg(long = "dataRoot", value_name = "DIR")]
    pub data_root: PathBuf,

    /// Print each target as it is invoked, plus a closing summary
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. The command
/// implementation returns `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the run and map the aggregate outcome to an exit code.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let mut reporter = ConsoleReporter::new(cli.verbose);

    let summary = runner::run_suite(
        &cli.source_root,
        &cli.data_root,
        &DirectoryDiscovery,
        &ProcessExecutor,
        &mut reporter,
    )
    .map_err(|e| CliError::failure(format!("Error running suite: {}", e)))?;

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        // One diagnostic line per failure was already printed by the
        // reporter; nothing left to say here.
        Err(CliError::new("", ExitCode::FAILURE))
    }
}

// ============================================================================
// Tests
// ============================================================================
