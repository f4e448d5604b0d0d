//! CI driver for the compiler stress-testing pipeline.
//!
//! Builds the toolchain, clones the tooling repositories, runs the external
//! stress tester over the filtered project list, and reconciles its results
//! against the declared expected failures into a PASS/FAIL verdict.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use driver::config::{DriverConfig, ensure_supported_host};
use driver::{drive, exit_codes, logging};

#[derive(Parser)]
#[command(
    name = "driver",
    version,
    about = "CI driver for the compiler stress-testing pipeline"
)]
struct Cli {
    /// Target branch under test.
    branch: String,

    /// Forward the runner's sandboxing flag.
    #[arg(long)]
    sandbox: bool,

    /// Projects file to filter and run.
    #[arg(long, value_name = "PATH", default_value = "projects.json")]
    projects: PathBuf,

    /// Declared expected-failures file.
    #[arg(long, value_name = "PATH", default_value = "xfails.json")]
    xfails: PathBuf,

    /// Only run project actions carrying this tag.
    #[arg(long, value_name = "TAG")]
    select: Option<String>,

    /// Verbose runner output.
    #[arg(long)]
    verbose: bool,

    /// Build the toolchain without assertions.
    #[arg(long)]
    no_assertions: bool,

    /// Debug toolchain build instead of release.
    #[arg(long)]
    debug: bool,

    /// Use this compiler instead of the freshly built one.
    #[arg(long, value_name = "PATH")]
    compiler: Option<PathBuf>,

    /// Skip cloning the tooling repositories.
    #[arg(long)]
    skip_clone: bool,

    /// Skip the toolchain build.
    #[arg(long)]
    skip_build: bool,

    /// Skip the stress run and only process existing results.
    #[arg(long)]
    skip_run: bool,

    /// Compiler checkout hosting utils/build-script.
    #[arg(long, value_name = "PATH", default_value = ".")]
    toolchain_dir: PathBuf,

    /// Scratch directory for derived files.
    #[arg(long, value_name = "PATH", default_value = "stress-scratch")]
    scratch_dir: PathBuf,

    /// Stress runner timeout in seconds (absent means no limit).
    #[arg(long, value_name = "SECS")]
    run_timeout_secs: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<DriverConfig> {
        let config = DriverConfig {
            branch: self.branch,
            sandbox: self.sandbox,
            projects_path: self.projects,
            xfails_path: self.xfails,
            select_tag: self.select,
            verbose: self.verbose,
            assertions: !self.no_assertions,
            debug_build: self.debug,
            compiler_override: self.compiler,
            skip_clone: self.skip_clone,
            skip_build: self.skip_build,
            skip_run: self.skip_run,
            toolchain_dir: self.toolchain_dir,
            scratch_dir: self.scratch_dir,
            run_timeout_secs: self.run_timeout_secs,
            ..DriverConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    logging::init();
    match run(Cli::parse()) {
        Ok(true) => std::process::exit(exit_codes::OK),
        Ok(false) => std::process::exit(exit_codes::FAILED),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let config = cli.into_config()?;
    // Pure result processing works anywhere; only the external phases need
    // the host toolchain.
    if !(config.skip_clone && config.skip_build && config.skip_run) {
        ensure_supported_host()?;
    }
    drive::run_pipeline(&config)
}
