//! Declared expected failures (XFails).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Leading marker on an XFail path meaning "match anywhere in the path".
pub const WILDCARD_MARKER: char = '*';

/// A pre-known issue, keyed by a path pattern and scoped to branches.
///
/// The path is either exact or wildcard-prefixed; matching is marker-strip
/// plus substring test, a deliberate contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Xfail {
    pub path: String,
    pub branches: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Xfail {
    /// The declared path with the wildcard marker stripped, if present.
    pub fn bare_fragment(&self) -> &str {
        self.path
            .strip_prefix(WILDCARD_MARKER)
            .unwrap_or(&self.path)
    }

    pub fn applies_to_branch(&self, branch: &str) -> bool {
        self.branches.iter().any(|candidate| candidate == branch)
    }

    /// True iff some processed file contains the bare fragment as a
    /// substring, i.e. the file this XFail targets was actually exercised.
    pub fn is_processed(&self, processed_files: &[String]) -> bool {
        let fragment = self.bare_fragment();
        processed_files.iter().any(|file| file.contains(fragment))
    }
}
