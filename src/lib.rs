#![forbid(unsafe_code)]
//! Sequential test-executable harness
//!
//! suite-runner scans a source root for executables whose names end in
//! `_tests`, runs each one in turn with a shared working directory, and
//! reports aggregate success or failure through its own exit code. One child
//! process at a time, no retries, no timeouts; the children inherit the
//! runner's environment and standard streams.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod runner;

pub use runner::discovery::{DirectoryDiscovery, TARGET_SUFFIX};
pub use runner::interfaces::{ProcessExecutor, RunnerError, TargetDiscovery, TargetExecutor, TargetOutcome};
pub use runner::{ConsoleReporter, Reporter, RunSummary, TargetFailure, run_suite};
