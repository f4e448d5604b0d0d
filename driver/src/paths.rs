//! Scratch file layout for one driver run.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Canonical scratch paths derived from the configured scratch directory.
///
/// Each derived file is written by exactly one phase and read by exactly one
/// later phase.
#[derive(Debug, Clone)]
pub struct ScratchPaths {
    pub scratch_dir: PathBuf,
    /// Destination for the tooling checkouts.
    pub tools_dir: PathBuf,
    /// Projects list with `archs_override` annotations applied.
    pub filtered_projects_path: PathBuf,
    /// Issue document written by the stress runner.
    pub results_path: PathBuf,
    /// Timing data for the external duration analysis; opaque to the driver.
    pub durations_path: PathBuf,
}

impl ScratchPaths {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        let scratch_dir = scratch_dir.into();
        Self {
            tools_dir: scratch_dir.join("tools"),
            filtered_projects_path: scratch_dir.join("filtered-projects.json"),
            results_path: scratch_dir.join("results.json"),
            durations_path: scratch_dir.join("durations.json"),
            scratch_dir,
        }
    }

    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [&self.scratch_dir, &self.tools_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("create directory {}", dir.display()))?;
        }
        Ok(())
    }

    /// Best-effort removal of derived files left over from a previous run.
    ///
    /// A missing file is the normal case. Other removal errors are logged and
    /// skipped; the phase that owns the file will fail with a better message
    /// if the leftover actually gets in its way.
    pub fn clean_stale(&self) {
        for path in [
            &self.filtered_projects_path,
            &self.results_path,
            &self.durations_path,
        ] {
            match fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "removed stale file"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(path = %path.display(), err = %err, "could not remove stale file");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_live_under_scratch_dir() {
        let paths = ScratchPaths::new("/tmp/scratch");
        assert_eq!(
            paths.filtered_projects_path,
            PathBuf::from("/tmp/scratch/filtered-projects.json")
        );
        assert_eq!(paths.results_path, PathBuf::from("/tmp/scratch/results.json"));
        assert_eq!(paths.tools_dir, PathBuf::from("/tmp/scratch/tools"));
    }

    #[test]
    fn clean_stale_tolerates_missing_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = ScratchPaths::new(temp.path().join("scratch"));
        paths.clean_stale();
    }

    #[test]
    fn clean_stale_removes_existing_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = ScratchPaths::new(temp.path());
        fs::write(&paths.results_path, "{}").expect("write");
        fs::write(&paths.durations_path, "{}").expect("write");

        paths.clean_stale();

        assert!(!paths.results_path.exists());
        assert!(!paths.durations_path.exists());
    }
}
