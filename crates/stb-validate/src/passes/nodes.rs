//! Node checks: duplicate ids and coordinate sanity

use super::PassContext;
use crate::issue::{IssueCode, ValidationIssue};
use stb_model::NumericValue;
use std::collections::HashMap;

const AXES: [&str; 3] = ["x", "y", "z"];

pub fn check(ctx: &PassContext<'_, '_>, issues: &mut Vec<ValidationIssue>) {
    let limit = ctx.rules.coordinate_magnitude_limit;
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for node in ctx.snapshot.nodes() {
        let occurrences = seen.entry(node.id.as_str()).or_insert(0);
        *occurrences += 1;
        // Report a duplicated id once, on its second occurrence
        if *occurrences == 2 {
            issues.push(
                ValidationIssue::error(
                    IssueCode::DuplicateId,
                    "StbNode",
                    format!("Duplicate node id '{}'", node.id),
                )
                .with_element_id(&node.id)
                .with_attribute("id")
                .with_value(&node.id)
                .with_expected("unique node id"),
            );
        }

        for axis in AXES {
            let raw = node.coordinate(axis);
            match NumericValue::of(raw) {
                NumericValue::Missing => issues.push(
                    ValidationIssue::error(
                        IssueCode::InvalidCoordinate,
                        "StbNode",
                        format!("Node '{}' is missing coordinate {}", node.id, axis),
                    )
                    .with_element_id(&node.id)
                    .with_attribute(axis)
                    .with_expected("finite number")
                    .with_repair(format!("Set {} to the default value", axis)),
                ),
                NumericValue::NotNumeric(text) => issues.push(
                    ValidationIssue::error(
                        IssueCode::InvalidCoordinate,
                        "StbNode",
                        format!("Node '{}' has non-numeric coordinate {} = '{}'", node.id, axis, text),
                    )
                    .with_element_id(&node.id)
                    .with_attribute(axis)
                    .with_value(text)
                    .with_expected("finite number")
                    .with_repair(format!("Set {} to the default value", axis)),
                ),
                NumericValue::NonFinite(n) => {
                    let suggestion = if n.is_nan() {
                        format!("Set {} to the default value", axis)
                    } else {
                        format!("Clamp {} to {}", axis, if n > 0.0 { limit } else { -limit })
                    };
                    issues.push(
                        ValidationIssue::error(
                            IssueCode::InvalidCoordinate,
                            "StbNode",
                            format!("Node '{}' has non-finite coordinate {} = {}", node.id, axis, n),
                        )
                        .with_element_id(&node.id)
                        .with_attribute(axis)
                        .with_value(raw.map(|v| v.as_text()).unwrap_or_default())
                        .with_expected("finite number")
                        .with_repair(suggestion),
                    );
                }
                NumericValue::Finite(n) if n.abs() > limit => issues.push(
                    ValidationIssue::warning(
                        IssueCode::CoordinateMagnitude,
                        "StbNode",
                        format!("Node '{}' coordinate {} = {} is implausibly large", node.id, axis, n),
                    )
                    .with_element_id(&node.id)
                    .with_attribute(axis)
                    .with_value(n.to_string())
                    .with_expected(format!("|{}| <= {}", axis, limit)),
                ),
                NumericValue::Finite(_) => {}
            }
        }
    }
}
