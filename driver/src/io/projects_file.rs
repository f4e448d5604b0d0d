//! Load, annotate, and rewrite the projects list.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::project::{Project, annotate_actions};

/// Read the projects file, annotate every action with its `archs_override`,
/// and write the result to `output`, overwriting any previous copy.
///
/// A malformed input file aborts the whole run; there is no partial filter.
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn filter_projects(input: &Path, output: &Path) -> Result<()> {
    let mut projects = load_projects(input)?;
    annotate_actions(&mut projects);
    write_projects(output, &projects)?;
    debug!(count = projects.len(), "projects filtered");
    Ok(())
}

pub fn load_projects(path: &Path) -> Result<Vec<Project>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read projects {}", path.display()))?;
    let projects: Vec<Project> = serde_json::from_str(&contents)
        .with_context(|| format!("parse projects {}", path.display()))?;
    Ok(projects)
}

/// Serialize to pretty-printed JSON with trailing newline.
fn write_projects(path: &Path, projects: &[Project]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let mut buf = serde_json::to_string_pretty(projects).context("serialize projects")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write projects {}", path.display()))?;
    Ok(())
}
