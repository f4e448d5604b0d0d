//! Stress runner invocation.
//!
//! The runner is an external collaborator; this module builds its environment
//! and command line. A runner failure is recorded, not propagated, so that
//! whatever partial results exist still reach the report.

use std::collections::BTreeMap;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::config::DriverConfig;
use crate::io::build::{compiler_path, products_bin_dir};
use crate::io::process::run_command;
use crate::paths::ScratchPaths;

/// Executable name of the stress runner inside the built products.
pub const RUNNER_EXECUTABLE: &str = "run-stress-tests";

/// Environment passed to the stress runner, in deterministic order.
pub fn stress_env(config: &DriverConfig, paths: &ScratchPaths) -> BTreeMap<String, String> {
    let bin = products_bin_dir(config);
    let mut env = BTreeMap::new();
    env.insert(
        "STRESS_COMPILER".to_string(),
        compiler_path(config).display().to_string(),
    );
    env.insert(
        "STRESS_WRAPPER".to_string(),
        bin.join("stress-wrapper").display().to_string(),
    );
    env.insert(
        "STRESS_TESTER".to_string(),
        bin.join("stress-test").display().to_string(),
    );
    env.insert(
        "STRESS_VERBOSE".to_string(),
        if config.verbose { "1" } else { "0" }.to_string(),
    );
    env.insert(
        "STRESS_REQUEST_LIMIT".to_string(),
        config.request_limit.to_string(),
    );
    env.insert(
        "STRESS_RESULTS_FILE".to_string(),
        paths.results_path.display().to_string(),
    );
    env.insert(
        "STRESS_DURATIONS_FILE".to_string(),
        paths.durations_path.display().to_string(),
    );
    env.insert("STRESS_BRANCH".to_string(), config.branch.clone());
    env.insert(
        "STRESS_REWRITE_MODES".to_string(),
        config.rewrite_modes.join(" "),
    );
    env
}

/// Build the runner command line over the filtered projects file.
pub fn stress_command(config: &DriverConfig, paths: &ScratchPaths) -> Command {
    let mut cmd = Command::new(products_bin_dir(config).join(RUNNER_EXECUTABLE));
    cmd.arg(&paths.filtered_projects_path);
    if let Some(tag) = &config.select_tag {
        cmd.args(["--filter-by-tag", tag]);
    }
    if config.sandbox {
        cmd.arg("--sandbox");
    }
    for (key, value) in stress_env(config, paths) {
        cmd.env(key, value);
    }
    cmd
}

/// Run the stress tester. Returns `true` if the run failed (non-zero exit or
/// timeout); the caller folds that into the final verdict instead of
/// aborting, because the partial results still need to be reported.
#[instrument(skip_all, fields(timeout_secs = config.run_timeout_secs))]
pub fn run_stress_tester(config: &DriverConfig, paths: &ScratchPaths) -> Result<bool> {
    info!(projects = %paths.filtered_projects_path.display(), "invoking stress runner");
    let timeout = config.run_timeout_secs.map(Duration::from_secs);
    let output = run_command(
        stress_command(config, paths),
        timeout,
        config.output_limit_bytes,
    )
    .context("spawn stress runner")?;

    if output.timed_out {
        warn!("stress runner timed out; continuing to result processing");
        return Ok(true);
    }
    if !output.status.success() {
        warn!(
            exit_code = ?output.status.code(),
            "stress runner failed; continuing to result processing"
        );
        return Ok(true);
    }
    Ok(false)
}
