//! Geometric plausibility of two-node members

use super::{mm, PassContext};
use crate::issue::{IssueCode, ValidationIssue};

pub fn check(ctx: &PassContext<'_, '_>, issues: &mut Vec<ValidationIssue>) {
    let node_map = ctx.snapshot.node_map();
    let min_length = ctx.rules.min_member_length;

    for record in ctx.snapshot.all_elements() {
        // Identical endpoints are already reported as zero-length
        let Some((start, end)) = record.endpoints().filter(|(s, e)| s != e) else {
            continue;
        };
        let (Some(a), Some(b)) = (node_map.position(start), node_map.position(end)) else {
            continue;
        };

        let tag = record.kind.tag();
        let label = record.label();
        let length = a.distance(&b);
        let max_length = ctx.rules.max_length_for(record.kind);

        if length < min_length {
            let mut issue = ValidationIssue::warning(
                IssueCode::MemberTooShort,
                tag,
                format!(
                    "{} '{}' is only {} mm long (minimum {} mm)",
                    tag,
                    label,
                    mm(length),
                    mm(min_length)
                ),
            )
            .with_value(mm(length))
            .with_expected(format!(">= {} mm", mm(min_length)))
            .with_repair(format!("Remove {} '{}'", tag, label));
            if let Some(id) = record.id() {
                issue = issue.with_element_id(id);
            }
            issues.push(issue);
        } else if length > max_length {
            let mut issue = ValidationIssue::warning(
                IssueCode::MemberTooLong,
                tag,
                format!(
                    "{} '{}' is {} mm long (maximum {} mm)",
                    tag,
                    label,
                    mm(length),
                    mm(max_length)
                ),
            )
            .with_value(mm(length))
            .with_expected(format!("<= {} mm", mm(max_length)));
            if let Some(id) = record.id() {
                issue = issue.with_element_id(id);
            }
            issues.push(issue);
        }
    }
}
