//! Side-effecting operations: subprocess execution, git, JSON documents on
//! disk.

pub mod build;
pub mod git;
pub mod process;
pub mod projects_file;
pub mod results_file;
pub mod stress;
