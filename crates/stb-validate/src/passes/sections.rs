//! Section data: delegated to the configured `SectionValidator`

use super::PassContext;
use crate::issue::{IssueCode, ValidationIssue};
use stb_model::SectionFamily;

pub fn check(ctx: &PassContext<'_, '_>, issues: &mut Vec<ValidationIssue>) {
    for family in SectionFamily::ALL {
        let tag = family.tag();
        for section in ctx.snapshot.sections(family) {
            let findings = ctx.sections.validate(section, family);

            for finding in findings.errors {
                let mut issue = ValidationIssue::error(
                    IssueCode::SectionData,
                    tag,
                    format!("Section '{}': {}", section.id, finding.message),
                )
                .with_element_id(&section.id);
                if let Some(attribute) = &finding.attribute {
                    issue = issue
                        .with_attribute(attribute)
                        .with_expected("finite number")
                        .with_repair(format!("Set {} to the default value", attribute));
                }
                if let Some(value) = finding.value {
                    issue = issue.with_value(value);
                }
                issues.push(issue);
            }

            for finding in findings.warnings {
                let mut issue = ValidationIssue::warning(
                    IssueCode::SectionData,
                    tag,
                    format!("Section '{}': {}", section.id, finding.message),
                )
                .with_element_id(&section.id);
                if let Some(attribute) = finding.attribute {
                    issue = issue.with_attribute(attribute);
                }
                if let Some(value) = finding.value {
                    issue = issue.with_value(value);
                }
                issues.push(issue);
            }
        }
    }
}
