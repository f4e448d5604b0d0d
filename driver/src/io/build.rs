//! Toolchain build invocation.
//!
//! The build itself is an opaque collaborator: this module only assembles the
//! flag list, launches `utils/build-script`, and fails hard on a non-zero
//! exit.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::config::DriverConfig;
use crate::io::process::run_checked;
use crate::paths::ScratchPaths;

/// Build tree subdirectory produced by the flags below.
pub const BUILD_SUBDIR: &str = "stress-ci";

/// Assemble the build-script flag list for this configuration.
pub fn build_args(config: &DriverConfig, paths: &ScratchPaths) -> Vec<String> {
    let mut args = vec![
        if config.debug_build {
            "--debug"
        } else {
            "--release"
        }
        .to_string(),
        if config.assertions {
            "--assertions"
        } else {
            "--no-assertions"
        }
        .to_string(),
    ];
    for flag in [
        "--build-stress-tester",
        "--build-source-wrapper",
        "--skip-build-benchmarks",
        "--skip-test-toolchain",
    ] {
        args.push(flag.to_string());
    }
    args.push("--build-subdir".to_string());
    args.push(BUILD_SUBDIR.to_string());
    args.push("--tools-src".to_string());
    args.push(paths.tools_dir.display().to_string());
    args
}

/// Invoke the toolchain build with no timeout; a non-zero exit aborts the
/// run.
#[instrument(skip_all)]
pub fn build_toolchain(config: &DriverConfig, paths: &ScratchPaths) -> Result<()> {
    let script = config.toolchain_dir.join("utils/build-script");
    info!(script = %script.display(), "building toolchain");
    let mut cmd = Command::new(&script);
    cmd.args(build_args(config, paths))
        .current_dir(&config.toolchain_dir);
    run_checked(cmd, None, config.output_limit_bytes, "build-script")
        .context("build toolchain")?;
    Ok(())
}

/// Directory holding the built products (compiler, wrapper, stress tester).
pub fn products_bin_dir(config: &DriverConfig) -> PathBuf {
    config
        .toolchain_dir
        .join("build")
        .join(BUILD_SUBDIR)
        .join("bin")
}

/// The compiler the stress tester should exercise.
pub fn compiler_path(config: &DriverConfig) -> PathBuf {
    match &config.compiler_override {
        Some(path) => path.clone(),
        None => products_bin_dir(config).join("swiftc"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_with_assertions_is_the_default_flag_shape() {
        let config = DriverConfig::default();
        let paths = ScratchPaths::new("/tmp/scratch");
        let args = build_args(&config, &paths);
        assert_eq!(args[0], "--release");
        assert_eq!(args[1], "--assertions");
        assert!(args.contains(&"--build-stress-tester".to_string()));
        assert!(args.contains(&"/tmp/scratch/tools".to_string()));
    }

    #[test]
    fn debug_and_no_assertions_variants() {
        let config = DriverConfig {
            debug_build: true,
            assertions: false,
            ..DriverConfig::default()
        };
        let args = build_args(&config, &ScratchPaths::new("/tmp/scratch"));
        assert_eq!(args[0], "--debug");
        assert_eq!(args[1], "--no-assertions");
    }

    #[test]
    fn compiler_override_wins_over_build_tree() {
        let config = DriverConfig {
            compiler_override: Some(PathBuf::from("/opt/toolchain/bin/swiftc")),
            ..DriverConfig::default()
        };
        assert_eq!(
            compiler_path(&config),
            PathBuf::from("/opt/toolchain/bin/swiftc")
        );

        let derived = compiler_path(&DriverConfig::default());
        assert!(derived.ends_with("build/stress-ci/bin/swiftc"));
    }
}
