//! Loading of the runner's results document and the declared XFail list.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::core::reconcile::ResultsDoc;
use crate::core::xfail::Xfail;

/// Load the results document, if the runner wrote one.
///
/// An absent file is `None`: nothing to report. Note this cannot distinguish
/// "the run was trivially clean" from "the runner died before writing" — a
/// runner crash is recorded separately by the invoker, and the warning below
/// keeps the ambiguity visible in CI logs. A present but malformed document
/// is fatal.
pub fn load_results(path: &Path) -> Result<Option<ResultsDoc>> {
    if !path.exists() {
        warn!(path = %path.display(), "no results document; treating as nothing to report");
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read results {}", path.display()))?;
    let doc: ResultsDoc = serde_json::from_str(&contents)
        .with_context(|| format!("parse results {}", path.display()))?;
    debug!(
        issues = doc.issues.len(),
        processed = doc.processed_files.len(),
        "results loaded"
    );
    Ok(Some(doc))
}

/// Load the declared XFail list.
///
/// The file is a checked-in input, so absence is an error here, unlike the
/// results document.
pub fn load_xfails(path: &Path) -> Result<Vec<Xfail>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read xfails {}", path.display()))?;
    let xfails: Vec<Xfail> = serde_json::from_str(&contents)
        .with_context(|| format!("parse xfails {}", path.display()))?;
    Ok(xfails)
}
