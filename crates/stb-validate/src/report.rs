//! Validation report types and query helpers

use crate::issue::{Category, Severity, ValidationIssue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counts for a validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_elements: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    /// Entity counts keyed by STB tag
    pub element_counts: BTreeMap<String, usize>,
    pub repairable_count: usize,
}

impl Statistics {
    /// Count `issues` by severity and repairability
    pub fn tally(issues: &[ValidationIssue], element_counts: BTreeMap<String, usize>) -> Self {
        let count = |severity: Severity| issues.iter().filter(|i| i.severity == severity).count();
        Self {
            total_elements: element_counts.values().sum(),
            error_count: count(Severity::Error),
            warning_count: count(Severity::Warning),
            info_count: count(Severity::Info),
            element_counts,
            repairable_count: issues.iter().filter(|i| i.repairable).count(),
        }
    }
}

/// A complete validation report. A new one is produced on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub statistics: Statistics,
    pub timestamp: DateTime<Utc>,
}

impl ValidationReport {
    /// Assemble a report; `valid` is derived from the issues
    pub fn new(issues: Vec<ValidationIssue>, statistics: Statistics) -> Self {
        Self {
            valid: !issues.iter().any(|i| i.severity == Severity::Error),
            issues,
            statistics,
            timestamp: Utc::now(),
        }
    }

    /// Check if the model is valid (no errors)
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn repairable_issues(&self) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.repairable).collect()
    }

    pub fn issues_by_category(&self, category: Category) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.category == category).collect()
    }

    pub fn issues_by_element_type(&self, element_type: &str) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.element_type == element_type)
            .collect()
    }

    /// One-line summary of the listed issues
    pub fn summary(&self) -> String {
        let total = self.issues.len();
        if total == 0 {
            return "No issues found.".to_string();
        }

        format!(
            "{} issue(s): {} error(s), {} warning(s), {} info, {} repairable",
            total,
            self.error_count(),
            self.warning_count(),
            self.info_count(),
            self.issues.iter().filter(|i| i.repairable).count(),
        )
    }
}

pub fn get_repairable_issues(report: &ValidationReport) -> Vec<&ValidationIssue> {
    report.repairable_issues()
}

pub fn get_issues_by_category(report: &ValidationReport, category: Category) -> Vec<&ValidationIssue> {
    report.issues_by_category(category)
}

pub fn get_issues_by_element_type<'r>(
    report: &'r ValidationReport,
    element_type: &str,
) -> Vec<&'r ValidationIssue> {
    report.issues_by_element_type(element_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueCode;

    fn sample_issues() -> Vec<ValidationIssue> {
        vec![
            ValidationIssue::error(IssueCode::DanglingNodeRef, "StbColumn", "dangling")
                .with_element_id("C1")
                .with_repair("Remove column"),
            ValidationIssue::warning(IssueCode::DuplicateStoryHeight, "StbStory", "dup")
                .with_element_id("S2")
                .with_repair("Drop story"),
            ValidationIssue::warning(IssueCode::MemberTooLong, "StbGirder", "long")
                .with_element_id("G1"),
        ]
    }

    #[test]
    fn test_validity_follows_errors() {
        let issues = sample_issues();
        let report = ValidationReport::new(issues.clone(), Statistics::default());
        assert!(!report.is_valid());

        let warnings_only: Vec<_> = issues
            .into_iter()
            .filter(|i| i.severity != Severity::Error)
            .collect();
        let report = ValidationReport::new(warnings_only, Statistics::default());
        assert!(report.is_valid());
    }

    #[test]
    fn test_statistics_tally() {
        let mut counts = BTreeMap::new();
        counts.insert("StbNode".to_string(), 4);
        counts.insert("StbColumn".to_string(), 2);
        let stats = Statistics::tally(&sample_issues(), counts);

        assert_eq!(stats.total_elements, 6);
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.warning_count, 2);
        assert_eq!(stats.info_count, 0);
        assert_eq!(stats.repairable_count, 2);
    }

    #[test]
    fn test_query_helpers() {
        let report = ValidationReport::new(sample_issues(), Statistics::default());

        assert_eq!(get_repairable_issues(&report).len(), 2);
        assert_eq!(get_issues_by_category(&report, Category::Geometry).len(), 1);
        assert_eq!(get_issues_by_category(&report, Category::Structure).len(), 0);
        let girders = get_issues_by_element_type(&report, "StbGirder");
        assert_eq!(girders.len(), 1);
        assert_eq!(girders[0].element_id.as_deref(), Some("G1"));
    }

    #[test]
    fn test_summary() {
        let empty = ValidationReport::new(Vec::new(), Statistics::default());
        assert_eq!(empty.summary(), "No issues found.");

        let report = ValidationReport::new(sample_issues(), Statistics::default());
        assert!(report.summary().starts_with("3 issue(s): 1 error(s), 2 warning(s)"));
    }
}
