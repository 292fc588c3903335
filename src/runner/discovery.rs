//! Target discovery
//!
//! Resolves the user-supplied source root to an absolute path and lists the
//! entries directly under it whose names end in [`TARGET_SUFFIX`]. The
//! listing is an explicit `read_dir` filtered by a suffix predicate rather
//! than a glob, so the matching semantics are the same on every platform:
//! case-sensitive, non-recursive, no extension filtering, files and
//! directories alike.

use std::fs;
use std::path::{Path, PathBuf};

use super::interfaces::{RunnerError, TargetDiscovery};

/// Naming marker that identifies a test executable under the source root.
pub const TARGET_SUFFIX: &str = "_tests";

/// Resolve the source root to an absolute path.
///
/// Resolution is purely lexical: the path is made absolute against the
/// current directory without touching the filesystem, and a nonexistent
/// source root is not an error (it simply yields no targets later).
pub fn resolve_source_root(source_root: &Path) -> Result<PathBuf, RunnerError> {
    std::path::absolute(source_root).map_err(|e| RunnerError::ResolveSourceRoot {
        path: source_root.to_path_buf(),
        source: e,
    })
}

/// Whether `name` marks a test target.
pub fn is_target_name(name: &str) -> bool {
    name.ends_with(TARGET_SUFFIX)
}

/// Filesystem-based discovery: one `read_dir` over the source root.
pub struct DirectoryDiscovery;

impl TargetDiscovery for DirectoryDiscovery {
    fn discover_targets(&self, source_root: &Path) -> Result<Vec<PathBuf>, RunnerError> {
        let entries = match fs::read_dir(source_root) {
            Ok(entries) => entries,
            Err(e) => {
                // A missing or unreadable source root yields no targets,
                // which the caller treats as trivial success.
                tracing::debug!(
                    source_root = %source_root.display(),
                    error = %e,
                    "source root not listable; no targets"
                );
                return Ok(Vec::new());
            }
        };

        let mut targets = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name();
            if name.to_str().is_some_and(is_target_name) {
                targets.push(entry.path());
            }
        }

        // Deterministic invocation order, so repeated runs report failures
        // identically.
        targets.sort();
        Ok(targets)
    }
}

// ============================================================================
// Tests
// ============================================================================
