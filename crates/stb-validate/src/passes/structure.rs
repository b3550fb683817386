//! Structural presence: required groups under `StbModel`

use super::PassContext;
use crate::issue::{IssueCode, ValidationIssue};
use tracing::debug;

pub fn check(ctx: &PassContext<'_, '_>, issues: &mut Vec<ValidationIssue>) {
    let model = ctx.snapshot.model();

    match &model.nodes {
        None => issues.push(
            ValidationIssue::error(IssueCode::MissingGroup, "StbNodes", "StbNodes group is missing")
                .with_expected("StbNodes containing at least one StbNode"),
        ),
        Some(nodes) if nodes.is_empty() => issues.push(
            ValidationIssue::error(IssueCode::EmptyNodes, "StbNode", "Model contains no StbNode elements")
                .with_expected("at least one StbNode"),
        ),
        Some(_) => {}
    }

    if model.members.is_none() {
        issues.push(
            ValidationIssue::error(IssueCode::MissingGroup, "StbMembers", "StbMembers group is missing")
                .with_expected("StbMembers group"),
        );
    }

    for key in ctx.snapshot.unknown_member_groups() {
        debug!(group = key, "ignoring unknown member group");
    }
}
