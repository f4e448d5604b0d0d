//! Project list filtering: `archs_override` annotation per build action.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Build-system variable meaning "use whatever architectures the action
/// already specified".
pub const ARCHS_PASSTHROUGH: &str = "$(ARCHS)";

const DESTINATION_IOS: &str = "generic/platform=iOS";
const DESTINATION_MACOS: &str = "generic/platform=macOS";

/// A named collection of build actions from the projects file.
///
/// Fields the driver does not interpret pass through the filter untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub actions: Vec<Action>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One build configuration within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archs_override: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Architecture override derived from a destination.
pub fn archs_override_for(destination: Option<&str>) -> &'static str {
    match destination {
        Some(DESTINATION_IOS) => "arm64",
        Some(DESTINATION_MACOS) => "x86_64",
        _ => ARCHS_PASSTHROUGH,
    }
}

/// Annotate every action with its derived `archs_override`.
///
/// The override depends only on the destination, so applying this twice
/// yields the same result as applying it once.
pub fn annotate_actions(projects: &mut [Project]) {
    for project in projects {
        for action in &mut project.actions {
            action.archs_override =
                Some(archs_override_for(action.destination.as_deref()).to_string());
        }
    }
}
