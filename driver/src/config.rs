//! Driver configuration assembled from the command line.
//!
//! One invocation gets one flat [`DriverConfig`] record, built by the CLI
//! layer, validated once, and passed by reference into every phase. No phase
//! reads ambient global state.

use std::path::PathBuf;

use anyhow::{Result, anyhow};

/// An auxiliary tooling repository pinned to the branch under test.
#[derive(Debug, Clone, Copy)]
pub struct ToolRepo {
    pub name: &'static str,
    pub url: &'static str,
}

/// Repositories cloned before the toolchain build. The build script compiles
/// the stress tester and the compiler wrapper out of these checkouts.
pub const TOOL_REPOS: [ToolRepo; 2] = [
    ToolRepo {
        name: "stress-tester",
        url: "https://github.com/compiler-infra/stress-tester.git",
    },
    ToolRepo {
        name: "source-wrapper",
        url: "https://github.com/compiler-infra/source-wrapper.git",
    },
];

/// Flat configuration record for one driver invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Branch under test; tooling clones and XFail hints both use it.
    pub branch: String,
    /// Forward the runner's sandboxing flag.
    pub sandbox: bool,
    pub projects_path: PathBuf,
    pub xfails_path: PathBuf,
    /// Only run project actions carrying this tag.
    pub select_tag: Option<String>,
    pub verbose: bool,
    /// Build the toolchain with assertions (the CI default).
    pub assertions: bool,
    /// Debug toolchain build instead of release.
    pub debug_build: bool,
    /// Use this compiler instead of the one in the toolchain build tree.
    pub compiler_override: Option<PathBuf>,
    pub skip_clone: bool,
    pub skip_build: bool,
    pub skip_run: bool,
    /// Compiler checkout hosting `utils/build-script` and the build tree.
    pub toolchain_dir: PathBuf,
    /// Scratch directory for derived files owned by this run.
    pub scratch_dir: PathBuf,
    /// Stress runner wall-clock limit; `None` waits forever.
    pub run_timeout_secs: Option<u64>,
    /// Per-stream cap on captured subprocess output.
    pub output_limit_bytes: usize,
    /// Source rewrite modes the stress tester exercises, in order.
    pub rewrite_modes: Vec<String>,
    /// Cap on stress requests issued per file before the runner moves on.
    pub request_limit: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            branch: "main".to_string(),
            sandbox: false,
            projects_path: PathBuf::from("projects.json"),
            xfails_path: PathBuf::from("xfails.json"),
            select_tag: None,
            verbose: false,
            assertions: true,
            debug_build: false,
            compiler_override: None,
            skip_clone: false,
            skip_build: false,
            skip_run: false,
            toolchain_dir: PathBuf::from("."),
            scratch_dir: PathBuf::from("stress-scratch"),
            run_timeout_secs: None,
            output_limit_bytes: 100_000,
            rewrite_modes: vec![
                "none".to_string(),
                "concurrent".to_string(),
                "inside-out".to_string(),
            ],
            request_limit: 1000,
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.branch.trim().is_empty() {
            return Err(anyhow!("branch must be non-empty"));
        }
        if self.run_timeout_secs == Some(0) {
            return Err(anyhow!("run timeout must be > 0 seconds"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output limit must be > 0 bytes"));
        }
        if self.rewrite_modes.is_empty()
            || self.rewrite_modes.iter().any(|mode| mode.trim().is_empty())
        {
            return Err(anyhow!("rewrite modes must be a non-empty list"));
        }
        Ok(())
    }
}

/// Refuse to run the external phases on a host that cannot drive them.
///
/// The sample projects build through `xcodebuild`, which only exists on
/// macOS. Pure result processing has no such requirement, so the check is
/// separate from [`DriverConfig::validate`].
pub fn ensure_supported_host() -> Result<()> {
    if cfg!(target_os = "macos") {
        return Ok(());
    }
    Err(anyhow!(
        "unsupported host platform: the stress pipeline requires macOS"
    ))
}
