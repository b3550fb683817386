//! Member checks: ids, required references, zero-length members

use super::PassContext;
use crate::issue::{IssueCode, ValidationIssue};
use stb_model::ElementKind;
use std::collections::HashMap;

pub fn check(ctx: &PassContext<'_, '_>, issues: &mut Vec<ValidationIssue>) {
    for kind in ElementKind::ALL {
        let tag = kind.tag();
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for record in ctx.snapshot.elements(kind) {
            let label = record.label();

            match record.id() {
                None => issues.push(
                    ValidationIssue::error(
                        IssueCode::MissingElementId,
                        tag,
                        format!("{} {} has no id", tag, label),
                    )
                    .with_attribute("id")
                    .with_expected("element id"),
                ),
                Some(id) => {
                    let occurrences = seen.entry(id).or_insert(0);
                    *occurrences += 1;
                    if *occurrences == 2 {
                        issues.push(
                            ValidationIssue::error(
                                IssueCode::DuplicateId,
                                tag,
                                format!("Duplicate {} id '{}'", tag, id),
                            )
                            .with_element_id(id)
                            .with_attribute("id")
                            .with_value(id)
                            .with_expected(format!("unique {} id", tag)),
                        );
                    }
                }
            }

            for section_ref in &record.section_refs {
                if section_ref.value.is_none() {
                    let issue = ValidationIssue::error(
                        IssueCode::MissingSectionRef,
                        tag,
                        format!("{} '{}' has no {}", tag, label, section_ref.attribute),
                    )
                    .with_attribute(section_ref.attribute)
                    .with_expected("section id")
                    .with_repair(format!("Remove {} '{}'", tag, label));
                    issues.push(with_id(issue, record.id()));
                }
            }

            for node_ref in &record.node_refs {
                if node_ref.value.is_none() {
                    let issue = ValidationIssue::error(
                        IssueCode::MissingNodeRef,
                        tag,
                        format!("{} '{}' has no {}", tag, label, node_ref.attribute),
                    )
                    .with_attribute(node_ref.attribute)
                    .with_expected("node id")
                    .with_repair(format!("Remove {} '{}'", tag, label));
                    issues.push(with_id(issue, record.id()));
                }
            }

            if let Some((start, end)) = record.endpoints() {
                if start == end {
                    let issue = ValidationIssue::error(
                        IssueCode::ZeroLength,
                        tag,
                        format!(
                            "{} '{}' is zero-length: both ends reference node '{}'",
                            tag, label, start
                        ),
                    )
                    .with_attribute(record.node_refs[1].attribute)
                    .with_value(end)
                    .with_expected(format!("a node other than '{}'", start))
                    .with_repair(format!("Remove {} '{}'", tag, label));
                    issues.push(with_id(issue, record.id()));
                }
            }
        }
    }
}

fn with_id(issue: ValidationIssue, id: Option<&str>) -> ValidationIssue {
    match id {
        Some(id) => issue.with_element_id(id),
        None => issue,
    }
}
