//! Git adapter for the tooling checkouts.
//!
//! The driver pins both auxiliary tool repositories to the branch under test,
//! so we keep a small, explicit wrapper around `git clone`.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::config::{DriverConfig, TOOL_REPOS};
use crate::io::process::run_checked;
use crate::paths::ScratchPaths;

/// Clone one repository at `branch` into `dest`.
///
/// A destination that already exists is left alone so retried CI jobs reuse
/// their workspace. A non-zero exit aborts the run.
#[instrument(skip_all, fields(url, branch))]
pub fn clone_repo(url: &str, branch: &str, dest: &Path, output_limit_bytes: usize) -> Result<()> {
    if dest.exists() {
        debug!(dest = %dest.display(), "checkout already present, skipping clone");
        return Ok(());
    }
    info!(dest = %dest.display(), "cloning");
    let mut cmd = Command::new("git");
    cmd.args(["clone", "--quiet", "--branch", branch, "--depth", "1", url])
        .arg(dest);
    run_checked(cmd, None, output_limit_bytes, "git clone")
        .with_context(|| format!("clone {url} at {branch}"))?;
    Ok(())
}

/// Clone both tooling repositories at the target branch.
pub fn clone_tool_repos(config: &DriverConfig, paths: &ScratchPaths) -> Result<()> {
    for repo in &TOOL_REPOS {
        let dest = paths.tools_dir.join(repo.name);
        clone_repo(repo.url, &config.branch, &dest, config.output_limit_bytes)?;
    }
    Ok(())
}
