//! Linear pipeline orchestration.
//!
//! Phases run strictly in sequence, each owning the scratch file it writes:
//! clone, build, filter, stress run, reconcile, report. Nothing here runs
//! concurrently; "blocking" means waiting for one child process at a time.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::config::DriverConfig;
use crate::core::reconcile::reconcile;
use crate::io::build::build_toolchain;
use crate::io::git::clone_tool_repos;
use crate::io::projects_file::filter_projects;
use crate::io::results_file::{load_results, load_xfails};
use crate::io::stress::run_stress_tester;
use crate::paths::ScratchPaths;
use crate::report::render;

/// Run the whole pipeline and return the overall verdict.
///
/// Clone and build failures abort with an error; a stress runner failure is
/// folded into the verdict so the report still covers partial results.
#[instrument(skip_all, fields(branch = %config.branch))]
pub fn run_pipeline(config: &DriverConfig) -> Result<bool> {
    let started_at = Utc::now();

    let paths = ScratchPaths::new(&config.scratch_dir);
    paths.ensure_layout()?;
    paths.clean_stale();

    if config.skip_clone {
        debug!("skipping tools clone");
    } else {
        clone_tool_repos(config, &paths).context("clone tooling repositories")?;
    }

    if config.skip_build {
        debug!("skipping toolchain build");
    } else {
        build_toolchain(config, &paths)?;
    }

    filter_projects(&config.projects_path, &paths.filtered_projects_path)?;

    let run_failed = if config.skip_run {
        debug!("skipping stress run");
        false
    } else {
        run_stress_tester(config, &paths)?
    };

    let xfails = load_xfails(&config.xfails_path)?;
    let results = load_results(&paths.results_path)?;
    let summary = reconcile(results.as_ref(), &xfails, run_failed);

    let duration_secs = (Utc::now() - started_at).num_milliseconds() as f64 / 1000.0;
    print!("{}", render(&summary, config, started_at, duration_secs));

    if paths.durations_path.exists() {
        info!(
            path = %paths.durations_path.display(),
            "timing data available for duration analysis"
        );
    }

    info!(success = summary.success, "pipeline finished");
    Ok(summary.success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn skipped_phases_with_clean_inputs_pass_vacuously() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join("projects.json"),
            r#"[{"path": "proj", "actions": [{"action": "build"}]}]"#,
        )
        .expect("write projects");
        fs::write(temp.path().join("xfails.json"), "[]").expect("write xfails");

        let config = DriverConfig {
            projects_path: temp.path().join("projects.json"),
            xfails_path: temp.path().join("xfails.json"),
            scratch_dir: temp.path().join("scratch"),
            skip_clone: true,
            skip_build: true,
            skip_run: true,
            ..DriverConfig::default()
        };

        let success = run_pipeline(&config).expect("pipeline");
        assert!(success);
        assert!(config.scratch_dir.join("filtered-projects.json").exists());
    }

    #[test]
    fn stale_results_are_removed_before_the_run() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("projects.json"), "[]").expect("write projects");
        fs::write(temp.path().join("xfails.json"), "[]").expect("write xfails");
        let scratch = temp.path().join("scratch");
        fs::create_dir_all(&scratch).expect("scratch dir");
        // A leftover failing document must not leak into this run's verdict.
        fs::write(scratch.join("results.json"), "not even json").expect("write stale");

        let config = DriverConfig {
            projects_path: temp.path().join("projects.json"),
            xfails_path: temp.path().join("xfails.json"),
            scratch_dir: scratch,
            skip_clone: true,
            skip_build: true,
            skip_run: true,
            ..DriverConfig::default()
        };

        let success = run_pipeline(&config).expect("pipeline");
        assert!(success);
    }

    #[test]
    fn missing_xfails_file_aborts() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("projects.json"), "[]").expect("write projects");

        let config = DriverConfig {
            projects_path: temp.path().join("projects.json"),
            xfails_path: temp.path().join("xfails.json"),
            scratch_dir: temp.path().join("scratch"),
            skip_clone: true,
            skip_build: true,
            skip_run: true,
            ..DriverConfig::default()
        };

        let err = run_pipeline(&config).unwrap_err();
        assert!(err.to_string().contains("read xfails"));
    }
}
