//! Run loop for discovered test targets
//!
//! ## Reporter Trait
//!
//! The runner uses a `Reporter` trait to separate reporting from execution.
//! The default `ConsoleReporter` is silent in quiet mode except for the one
//! diagnostic line each failed target earns; verbose mode adds per-target
//! progress and a closing summary.
//!
//! ## I/O Boundaries
//!
//! Discovery and execution are abstracted via traits in `interfaces.rs`, so
//! the loop itself can be tested with scripted implementations.

pub mod discovery;
pub mod interfaces;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use self::discovery::resolve_source_root;
use self::interfaces::{RunnerError, TargetDiscovery, TargetExecutor, TargetOutcome};

// ============================================================================
// Reporter
// ============================================================================

/// Trait for reporting run progress and results.
pub trait Reporter {
    /// Called once discovery is complete, before the first invocation
    fn on_collection_complete(&mut self, _target_count: usize) {}

    /// Called immediately before a target is invoked
    fn on_target_start(&mut self, _target: &Path) {}

    /// Called for each target that did not pass
    fn on_target_failed(&mut self, target: &Path, outcome: &TargetOutcome);

    /// Called after the last target has completed
    fn on_run_complete(&mut self, _summary: &RunSummary) {}
}

/// Default console reporter.
///
/// Quiet mode prints nothing for a fully passing run; the exit code is the
/// interface. Failures get one line each on stderr, naming the command and
/// the return code when there is one.
#[derive(Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn on_collection_complete(&mut self, target_count: usize) {
        if self.verbose {
            eprintln!("collected {} target(s)", target_count);
        }
    }

    fn on_target_start(&mut self, target: &Path) {
        if self.verbose {
            eprintln!("running {}", target.display());
        }
    }

    fn on_target_failed(&mut self, target: &Path, outcome: &TargetOutcome) {
        match outcome {
            TargetOutcome::Failed(Some(code)) => {
                eprintln!("{} failed with return code: {}", target.display(), code);
            }
            TargetOutcome::Failed(None) => {
                eprintln!("{} was terminated by a signal", target.display());
            }
            TargetOutcome::LaunchFailed(e) => {
                eprintln!("{} failed to launch: {}", target.display(), e);
            }
            TargetOutcome::Passed => {}
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        if self.verbose {
            eprintln!(
                "====== {} passed, {} failed in {:.2}s ======",
                summary.passed(),
                summary.failures.len(),
                summary.duration.as_secs_f64()
            );
        }
    }
}

// ============================================================================
// Run summary
// ============================================================================

/// A target that did not pass, with the outcome that condemned it.
#[derive(Debug)]
pub struct TargetFailure {
    pub target: PathBuf,
    pub outcome: TargetOutcome,
}

/// Summary of one run.
///
/// The aggregate outcome is `is_success()`: true until any target fails,
/// never reset within a run.
#[derive(Debug)]
pub struct RunSummary {
    pub total: usize,
    pub failures: Vec<TargetFailure>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn passed(&self) -> usize {
        self.total - self.failures.len()
    }
}

// ============================================================================
// Run loop
// ============================================================================

/// Discover all targets under `source_root` and run them sequentially with
/// their working directory set to `data_root`.
///
/// Exactly one child is active at a time and every discovered target is
/// invoked regardless of earlier failures. An empty discovery result is
/// trivial success.
pub fn run_suite<D, E, R>(
    source_root: &Path,
    data_root: &Path,
    discovery: &D,
    executor: &E,
    reporter: &mut R,
) -> Result<RunSummary, RunnerError>
where
    D: TargetDiscovery,
    E: TargetExecutor,
    R: Reporter,
{
    let start_time = Instant::now();

    let root = resolve_source_root(source_root)?;
    let targets = discovery.discover_targets(&root)?;
    tracing::debug!(
        source_root = %root.display(),
        count = targets.len(),
        "collected targets"
    );
    reporter.on_collection_complete(targets.len());

    let total = targets.len();
    let mut failures = Vec::new();

    for target in targets {
        reporter.on_target_start(&target);
        let outcome = executor.execute(&target, data_root);
        if !outcome.is_pass() {
            reporter.on_target_failed(&target, &outcome);
            failures.push(TargetFailure { target, outcome });
        }
    }

    let summary = RunSummary {
        total,
        failures,
        duration: start_time.elapsed(),
    };
    reporter.on_run_complete(&summary);
    Ok(summary)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;

    /// Discovery that hands back a fixed target list.
    struct FixedDiscovery(Vec<PathBuf>);

    impl TargetDiscovery for FixedDiscovery {
        fn discover_targets(&self, _source_root: &Path) -> Result<Vec<PathBuf>, RunnerError> {
            Ok(self.0.clone())
        }
    }

    /// Executor that replays scripted outcomes and records every invocation.
    struct ScriptedExecutor {
        /// (target name, outcome to return)
        script: Vec<(&'static str, fn() -> TargetOutcome)>,
        invocations: RefCell<Vec<(PathBuf, PathBuf)>>,
    }

    impl ScriptedExecutor {
        fn new(script: Vec<(&'static str, fn() -> TargetOutcome)>) -> Self {
            Self {
                script,
                invocations: RefCell::new(Vec::new()),
            }
        }
    }

    impl TargetExecutor for ScriptedExecutor {
        fn execute(&self, target: &Path, data_root: &Path) -> TargetOutcome {
            self.invocations
                .borrow_mut()
                .push((target.to_path_buf(), data_root.to_path_buf()));
            let name = target.file_name().unwrap().to_str().unwrap();
            let (_, outcome) = self
                .script
                .iter()
                .find(|(n, _)| *n == name)
                .expect("unscripted target");
            outcome()
        }
    }

    /// Reporter that counts callback deliveries.
    #[derive(Default)]
    struct RecordingReporter {
        collected: Option<usize>,
        started: Vec<PathBuf>,
        failed: Vec<PathBuf>,
        completed: bool,
    }

    impl Reporter for RecordingReporter {
        fn on_collection_complete(&mut self, target_count: usize) {
            self.collected = Some(target_count);
        }

        fn on_target_start(&mut self, target: &Path) {
            self.started.push(target.to_path_buf());
        }

        fn on_target_failed(&mut self, target: &Path, _outcome: &TargetOutcome) {
            self.failed.push(target.to_path_buf());
        }

        fn on_run_complete(&mut self, _summary: &RunSummary) {
            self.completed = true;
        }
    }

    fn passed() -> TargetOutcome {
        TargetOutcome::Passed
    }

    fn failed_2() -> TargetOutcome {
        TargetOutcome::Failed(Some(2))
    }

    fn launch_denied() -> TargetOutcome {
        TargetOutcome::LaunchFailed(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    fn target(name: &str) -> PathBuf {
        PathBuf::from("/build").join(name)
    }

    #[test]
    fn test_no_targets_is_trivial_success() {
        let discovery = FixedDiscovery(Vec::new());
        let executor = ScriptedExecutor::new(Vec::new());
        let mut reporter = RecordingReporter::default();

        let summary = run_suite(
            Path::new("/build"),
            Path::new("/data"),
            &discovery,
            &executor,
            &mut reporter,
        )
        .unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.total, 0);
        assert!(executor.invocations.borrow().is_empty());
        assert_eq!(reporter.collected, Some(0));
        assert!(reporter.failed.is_empty());
        assert!(reporter.completed);
    }

    #[test]
    fn test_all_passing_targets_invoked_once_each() {
        let discovery = FixedDiscovery(vec![target("a_tests"), target("b_tests")]);
        let executor = ScriptedExecutor::new(vec![("a_tests", passed), ("b_tests", passed)]);
        let mut reporter = RecordingReporter::default();

        let summary = run_suite(
            Path::new("/build"),
            Path::new("/data"),
            &discovery,
            &executor,
            &mut reporter,
        )
        .unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed(), 2);
        let invocations = executor.invocations.borrow();
        assert_eq!(invocations.len(), 2);
        assert!(reporter.failed.is_empty());
    }

    #[test]
    fn test_one_failure_does_not_short_circuit() {
        let discovery = FixedDiscovery(vec![
            target("a_tests"),
            target("b_tests"),
            target("c_tests"),
        ]);
        let executor = ScriptedExecutor::new(vec![
            ("a_tests", passed),
            ("b_tests", failed_2),
            ("c_tests", passed),
        ]);
        let mut reporter = RecordingReporter::default();

        let summary = run_suite(
            Path::new("/build"),
            Path::new("/data"),
            &discovery,
            &executor,
            &mut reporter,
        )
        .unwrap();

        assert!(!summary.is_success());
        // All three ran even though the second failed.
        assert_eq!(executor.invocations.borrow().len(), 3);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].target, target("b_tests"));
        assert!(matches!(
            summary.failures[0].outcome,
            TargetOutcome::Failed(Some(2))
        ));
        assert_eq!(reporter.failed, vec![target("b_tests")]);
    }

    #[test]
    fn test_launch_failure_counts_like_nonzero_exit() {
        let discovery = FixedDiscovery(vec![target("a_tests"), target("b_tests")]);
        let executor = ScriptedExecutor::new(vec![
            ("a_tests", launch_denied),
            ("b_tests", passed),
        ]);
        let mut reporter = RecordingReporter::default();

        let summary = run_suite(
            Path::new("/build"),
            Path::new("/data"),
            &discovery,
            &executor,
            &mut reporter,
        )
        .unwrap();

        assert!(!summary.is_success());
        // The launch failure did not stop the run.
        assert_eq!(executor.invocations.borrow().len(), 2);
        assert!(matches!(
            summary.failures[0].outcome,
            TargetOutcome::LaunchFailed(_)
        ));
    }

    #[test]
    fn test_one_report_line_per_failing_target() {
        let discovery = FixedDiscovery(vec![
            target("a_tests"),
            target("b_tests"),
            target("c_tests"),
        ]);
        let executor = ScriptedExecutor::new(vec![
            ("a_tests", failed_2),
            ("b_tests", passed),
            ("c_tests", launch_denied),
        ]);
        let mut reporter = RecordingReporter::default();

        let summary = run_suite(
            Path::new("/build"),
            Path::new("/data"),
            &discovery,
            &executor,
            &mut reporter,
        )
        .unwrap();

        assert_eq!(summary.failures.len(), 2);
        assert_eq!(reporter.failed, vec![target("a_tests"), target("c_tests")]);
    }

    #[test]
    fn test_data_root_passed_to_every_invocation() {
        let discovery = FixedDiscovery(vec![target("a_tests"), target("b_tests")]);
        let executor = ScriptedExecutor::new(vec![("a_tests", passed), ("b_tests", passed)]);
        let mut reporter = RecordingReporter::default();

        run_suite(
            Path::new("/build"),
            Path::new("/some/data"),
            &discovery,
            &executor,
            &mut reporter,
        )
        .unwrap();

        for (_, data_root) in executor.invocations.borrow().iter() {
            assert_eq!(data_root, Path::new("/some/data"));
        }
    }

    #[test]
    fn test_targets_run_in_discovery_order() {
        let discovery = FixedDiscovery(vec![
            target("a_tests"),
            target("b_tests"),
            target("c_tests"),
        ]);
        let executor = ScriptedExecutor::new(vec![
            ("a_tests", passed),
            ("b_tests", passed),
            ("c_tests", passed),
        ]);
        let mut reporter = RecordingReporter::default();

        run_suite(
            Path::new("/build"),
            Path::new("/data"),
            &discovery,
            &executor,
            &mut reporter,
        )
        .unwrap();

        let order: Vec<_> = executor
            .invocations
            .borrow()
            .iter()
            .map(|(t, _)| t.clone())
            .collect();
        assert_eq!(
            order,
            vec![target("a_tests"), target("b_tests"), target("c_tests")]
        );
        assert_eq!(reporter.started, order);
    }
}
