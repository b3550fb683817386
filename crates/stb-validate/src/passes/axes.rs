//! Axis checks: unique distances per group, negative distances

use super::{height_key, mm, PassContext};
use crate::issue::{IssueCode, ValidationIssue};
use stb_model::AxisGroup;
use std::collections::HashMap;

pub fn check(ctx: &PassContext<'_, '_>, issues: &mut Vec<ValidationIssue>) {
    for group in [AxisGroup::X, AxisGroup::Y] {
        let mut distances: HashMap<u64, (&str, bool)> = HashMap::new();

        for axis in ctx.snapshot.axes(group) {
            let Some(distance) = axis.distance else {
                continue;
            };

            match distances.get_mut(&height_key(distance)) {
                Some((first, reported)) if !*reported => {
                    *reported = true;
                    issues.push(
                        ValidationIssue::warning(
                            IssueCode::DuplicateAxisDistance,
                            group.tag(),
                            format!(
                                "Axis '{}' has the same distance ({} mm) as axis '{}'",
                                axis.id,
                                mm(distance),
                                first
                            ),
                        )
                        .with_element_id(&axis.id)
                        .with_attribute("distance")
                        .with_value(distance.to_string())
                        .with_expected("unique distance within the axis group")
                        .with_repair(format!("Keep axis '{}' and drop later duplicates", first)),
                    );
                }
                Some(_) => {}
                None => {
                    distances.insert(height_key(distance), (axis.id.as_str(), false));
                }
            }

            if distance < 0.0 {
                issues.push(
                    ValidationIssue::info(
                        IssueCode::NegativeAxisDistance,
                        group.tag(),
                        format!("Axis '{}' has a negative distance ({} mm)", axis.id, mm(distance)),
                    )
                    .with_element_id(&axis.id)
                    .with_attribute("distance")
                    .with_value(distance.to_string()),
                );
            }
        }
    }
}
