//! Runner I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the two operations that
//! touch the outside world:
//! - Target discovery (filesystem scan)
//! - Target execution (child-process invocation + exit-status capture)
//!
//! These interfaces keep the run loop free of filesystem and process
//! concerns, so it can be exercised in unit tests without spawning anything.
//! The default implementations preserve the harness's real behavior.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors that occur while preparing or driving a run
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to resolve source root '{path}': {source}")]
    ResolveSourceRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// Target Discovery Interface
// ============================================================================

/// Discover test targets under a source root.
///
/// This trait separates filesystem concerns from the run loop, allowing for
/// mocking in tests or alternative discovery strategies.
pub trait TargetDiscovery {
    /// Find all targets directly under `source_root` (non-recursive).
    /// Returns absolute paths; an empty list is not an error.
    fn discover_targets(&self, source_root: &Path) -> Result<Vec<PathBuf>, RunnerError>;
}

// ============================================================================
// Target Executor Interface
// ============================================================================

/// Outcome of a single target invocation.
///
/// A target that exited nonzero and a target that could not be launched at
/// all both count against the aggregate outcome; the variants only exist so
/// the reporter can word the diagnostic line.
#[derive(Debug)]
pub enum TargetOutcome {
    /// Child exited with status 0.
    Passed,
    /// Child exited with a nonzero status. `None` means it was terminated
    /// by a signal and has no exit code.
    Failed(Option<i32>),
    /// Child could not be launched (not executable, permission denied, ...).
    LaunchFailed(io::Error),
}

impl TargetOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TargetOutcome::Passed)
    }
}

/// Execute a single target and report how it ended.
///
/// This trait separates the process invocation from the run loop, allowing
/// for scripted executors in unit tests.
pub trait TargetExecutor {
    /// Run `target` with its working directory set to `data_root`, block
    /// until it finishes, and classify the result.
    fn execute(&self, target: &Path, data_root: &Path) -> TargetOutcome;
}

// ============================================================================
// Default Implementation
// ============================================================================

/// Child-process execution via `std::process::Command`.
///
/// The child is invoked with no arguments and inherits the runner's
/// environment and standard streams; only the exit status is read. There is
/// no timeout, so a hung child blocks the run.
pub struct ProcessExecutor;

impl TargetExecutor for ProcessExecutor {
    fn execute(&self, target: &Path, data_root: &Path) -> TargetOutcome {
        match Command::new(target).current_dir(data_root).status() {
            Ok(status) if status.success() => TargetOutcome::Passed,
            Ok(status) => TargetOutcome::Failed(status.code()),
            Err(e) => TargetOutcome::LaunchFailed(e),
        }
    }
}
