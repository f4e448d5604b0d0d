//! Reconciliation of observed issues against declared expected failures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::xfail::Xfail;

/// Issue document written by the stress runner.
///
/// Every field is required so a malformed document fails with the missing
/// field named, instead of a key-lookup error somewhere downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsDoc {
    /// Paths of unexpected issues, parallel to `issue_messages`.
    pub issues: Vec<String>,
    pub issue_messages: Vec<String>,
    /// XFail identifier to matched issue occurrences.
    pub expected_issues: BTreeMap<String, Vec<String>>,
    pub expected_issue_messages: BTreeMap<String, Vec<String>>,
    /// XFails the runner saw declared but never matched to an issue.
    pub unmatched_expected_issues: Vec<String>,
    /// Source files the runner actually exercised.
    pub processed_files: Vec<String>,
}

/// An unexpected issue with its display message, when the runner provided
/// one.
#[derive(Debug, Clone, PartialEq)]
pub struct UnexpectedIssue {
    pub path: String,
    pub message: Option<String>,
}

/// Ephemeral aggregate consumed by the reporter; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Overall verdict: no unexpected issues, no unmatched XFails, and the
    /// stress run itself did not fail.
    pub success: bool,
    /// The stress runner exited abnormally or timed out.
    pub run_failed: bool,
    pub unexpected: Vec<UnexpectedIssue>,
    /// Total matched occurrences across all XFail identifiers.
    pub expected_issue_count: usize,
    /// Distinct XFail identifiers with at least one match.
    pub expected_matched: usize,
    /// XFails declared but never matched by any issue.
    pub unmatched: Vec<String>,
    /// Declared paths of XFails whose target files were never exercised.
    pub not_processed: Vec<String>,
}

/// Classify results against the declared XFail list.
///
/// `results` of `None` means the runner wrote no document at all; by
/// convention that is a vacuous success, since an upstream build failure is
/// recorded separately through `run_failed`.
///
/// Each declared XFail lands in exactly one bucket: matched, unmatched, or
/// not processed. Not-processed takes precedence over unmatched (an
/// unexercised file cannot meaningfully fail to reproduce) and never affects
/// the verdict.
pub fn reconcile(results: Option<&ResultsDoc>, xfails: &[Xfail], run_failed: bool) -> RunSummary {
    let Some(results) = results else {
        return RunSummary {
            success: !run_failed,
            run_failed,
            unexpected: Vec::new(),
            expected_issue_count: 0,
            expected_matched: 0,
            unmatched: Vec::new(),
            not_processed: Vec::new(),
        };
    };

    let skipped: Vec<&Xfail> = xfails
        .iter()
        .filter(|xfail| !xfail.is_processed(&results.processed_files))
        .collect();
    let not_processed: Vec<String> = skipped.iter().map(|xfail| xfail.path.clone()).collect();

    let unmatched: Vec<String> = results
        .unmatched_expected_issues
        .iter()
        .filter(|entry| {
            !skipped
                .iter()
                .any(|xfail| entry.contains(xfail.bare_fragment()))
        })
        .cloned()
        .collect();

    let unexpected: Vec<UnexpectedIssue> = results
        .issues
        .iter()
        .enumerate()
        .map(|(idx, path)| UnexpectedIssue {
            path: path.clone(),
            message: results.issue_messages.get(idx).cloned(),
        })
        .collect();

    let expected_issue_count = results.expected_issues.values().map(Vec::len).sum();
    let expected_matched = results
        .expected_issues
        .values()
        .filter(|occurrences| !occurrences.is_empty())
        .count();

    let success = unexpected.is_empty() && unmatched.is_empty() && !run_failed;

    RunSummary {
        success,
        run_failed,
        unexpected,
        expected_issue_count,
        expected_matched,
        unmatched,
        not_processed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn xfail(path: &str) -> Xfail {
        Xfail {
            path: path.to_string(),
            branches: vec!["main".to_string()],
            extra: Map::new(),
        }
    }

    #[test]
    fn absent_results_document_is_vacuous_success() {
        let summary = reconcile(None, &[xfail("*Foo/bar.swift")], false);
        assert!(summary.success);
        assert_eq!(summary.expected_issue_count, 0);
        assert!(summary.not_processed.is_empty());
    }

    #[test]
    fn absent_results_with_failed_run_is_not_success() {
        let summary = reconcile(None, &[], true);
        assert!(!summary.success);
        assert!(summary.run_failed);
    }

    #[test]
    fn clean_results_pass() {
        let results = ResultsDoc {
            processed_files: vec!["project/Foo/bar.swift".to_string()],
            ..ResultsDoc::default()
        };
        let summary = reconcile(Some(&results), &[xfail("*Foo/bar.swift")], false);
        assert!(summary.success);
        assert!(summary.not_processed.is_empty());
    }

    #[test]
    fn unexpected_issues_fail_the_run() {
        let results = ResultsDoc {
            issues: vec!["project/Main.swift".to_string()],
            issue_messages: vec!["cursor-info crashed".to_string()],
            ..ResultsDoc::default()
        };
        let summary = reconcile(Some(&results), &[], false);
        assert!(!summary.success);
        assert_eq!(summary.unexpected.len(), 1);
        assert_eq!(summary.unexpected[0].path, "project/Main.swift");
        assert_eq!(
            summary.unexpected[0].message.as_deref(),
            Some("cursor-info crashed")
        );
    }

    #[test]
    fn unmatched_xfails_fail_the_run() {
        let results = ResultsDoc {
            unmatched_expected_issues: vec!["project/Foo/bar.swift".to_string()],
            processed_files: vec!["project/Foo/bar.swift".to_string()],
            ..ResultsDoc::default()
        };
        let summary = reconcile(Some(&results), &[xfail("*Foo/bar.swift")], false);
        assert!(!summary.success);
        assert_eq!(summary.unmatched, vec!["project/Foo/bar.swift".to_string()]);
    }

    #[test]
    fn not_processed_xfails_are_informational_only() {
        let xfails: Vec<Xfail> = (0..5).map(|n| xfail(&format!("*Mod{n}/file.swift"))).collect();
        let results = ResultsDoc {
            // The runner reports unexercised declarations as unmatched; they
            // must land in the not-processed bucket instead.
            unmatched_expected_issues: xfails
                .iter()
                .map(|entry| entry.bare_fragment().to_string())
                .collect(),
            processed_files: vec!["project/Other/file.swift".to_string()],
            ..ResultsDoc::default()
        };

        let summary = reconcile(Some(&results), &xfails, false);

        assert!(summary.success);
        assert_eq!(summary.not_processed.len(), 5);
        assert!(summary.unmatched.is_empty());
    }

    #[test]
    fn expected_issue_counts_sum_occurrences() {
        let mut expected_issues = BTreeMap::new();
        expected_issues.insert(
            "xfail-1".to_string(),
            vec!["a".to_string(), "b".to_string()],
        );
        expected_issues.insert("xfail-2".to_string(), vec!["c".to_string()]);
        expected_issues.insert("xfail-3".to_string(), Vec::new());
        let results = ResultsDoc {
            expected_issues,
            processed_files: vec!["project/Foo/bar.swift".to_string()],
            ..ResultsDoc::default()
        };

        let summary = reconcile(Some(&results), &[], false);

        assert_eq!(summary.expected_issue_count, 3);
        assert_eq!(summary.expected_matched, 2);
        assert!(summary.success);
    }

    #[test]
    fn failed_run_forces_failure_even_when_clean() {
        let results = ResultsDoc::default();
        let summary = reconcile(Some(&results), &[], true);
        assert!(!summary.success);
        assert!(summary.run_failed);
    }
}
