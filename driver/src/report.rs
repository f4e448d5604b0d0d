//! Human-readable run report.
//!
//! Pure formatting of a [`RunSummary`]. Printing never alters the verdict;
//! the caller maps `summary.success` to the exit code separately.

use chrono::{DateTime, Utc};

use crate::config::DriverConfig;
use crate::core::reconcile::RunSummary;

const RULE: &str = "======================================";

/// Render the full report, ending in the PASS/FAIL banner.
pub fn render(
    summary: &RunSummary,
    config: &DriverConfig,
    started_at: DateTime<Utc>,
    duration_secs: f64,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("{RULE}\n"));
    out.push_str(&format!(
        "Stress test results for branch '{}'\n",
        config.branch
    ));
    out.push_str(&format!(
        "started {}, took {duration_secs:.1}s\n",
        started_at.to_rfc3339()
    ));
    out.push_str(&format!("{RULE}\n\n"));

    if summary.run_failed {
        out.push_str("Build status: FAILED (stress runner exited abnormally)\n\n");
    } else {
        out.push_str("Build status: OK\n\n");
    }

    out.push_str(&format!(
        "Expected issues: {} occurrences across {} known failures\n\n",
        summary.expected_issue_count, summary.expected_matched
    ));

    out.push_str(&format!(
        "Expected failures not processed (no matching file exercised): {}\n",
        summary.not_processed.len()
    ));
    for path in &summary.not_processed {
        out.push_str(&format!("  {path}\n"));
    }
    out.push('\n');

    out.push_str(&format!("Unexpected issues: {}\n", summary.unexpected.len()));
    for issue in &summary.unexpected {
        match &issue.message {
            Some(message) => out.push_str(&format!("  {}: {message}\n", issue.path)),
            None => out.push_str(&format!("  {}\n", issue.path)),
        }
    }
    out.push('\n');

    out.push_str(&format!(
        "Unmatched expected failures: {}\n",
        summary.unmatched.len()
    ));
    for entry in &summary.unmatched {
        out.push_str(&format!("  {entry}\n"));
    }
    if !summary.unmatched.is_empty() {
        out.push_str(&format!(
            "  If these no longer fail on '{}', remove their entries from {}.\n",
            config.branch,
            config.xfails_path.display()
        ));
    }
    out.push('\n');

    out.push_str(&format!("{RULE}\n"));
    out.push_str(if summary.success { "PASS\n" } else { "FAIL\n" });
    out.push_str(&format!("{RULE}\n"));

    out
}
