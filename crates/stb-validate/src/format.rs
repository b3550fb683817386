//! Plain-text rendering of validation and repair reports

use crate::issue::Severity;
use crate::repair::{RepairReport, RepairStatus};
use crate::report::ValidationReport;
use std::fmt::Write;

const RULE: &str = "==================================================";

/// Fixed-layout text rendering of a validation report
pub fn format_validation_report(report: &ValidationReport) -> String {
    let stats = &report.statistics;
    let mut out = String::new();

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "ST-Bridge Validation Report");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Timestamp: {}", report.timestamp.to_rfc3339());
    let _ = writeln!(
        out,
        "Result: {}",
        if report.valid { "VALID" } else { "INVALID" }
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Statistics:");
    let _ = writeln!(out, "  Total elements: {}", stats.total_elements);
    let _ = writeln!(out, "  Errors: {}", stats.error_count);
    let _ = writeln!(out, "  Warnings: {}", stats.warning_count);
    let _ = writeln!(out, "  Info: {}", stats.info_count);
    let _ = writeln!(out, "  Repairable: {}", stats.repairable_count);

    if !stats.element_counts.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Element counts:");
        for (tag, count) in &stats.element_counts {
            let _ = writeln!(out, "  {}: {}", tag, count);
        }
    }

    for severity in Severity::ALL {
        let issues: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect();
        if issues.is_empty() {
            continue;
        }

        let heading = match severity {
            Severity::Error => "Errors",
            Severity::Warning => "Warnings",
            Severity::Info => "Info",
        };
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({}):", heading, issues.len());
        for issue in issues {
            let _ = writeln!(out, "- {}", issue.message);
            if let Some(id) = &issue.element_id {
                let _ = writeln!(out, "    Element: {} '{}'", issue.element_type, id);
            }
            if issue.repairable {
                let suggestion = issue
                    .repair_suggestion
                    .as_deref()
                    .unwrap_or("Auto-repair available");
                let _ = writeln!(out, "    Repair: {}", suggestion);
            }
        }
    }

    if report.issues.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No issues found.");
    }

    out
}

/// Text rendering of a repair run, one line per action
pub fn format_repair_report(report: &RepairReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Repair results: {}", report.summary());
    for action in &report.actions {
        let marker = match &action.status {
            RepairStatus::Applied => "applied".to_string(),
            RepairStatus::Skipped(_) => "skipped".to_string(),
        };
        let _ = writeln!(out, "  [{}] {}", marker, action.description);
    }

    if !report.removed_elements.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Removed: {}", report.removed_elements.join(", "));
    }

    out
}
