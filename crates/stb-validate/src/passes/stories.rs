//! Story checks: unique heights and names

use super::{mm, PassContext};
use crate::issue::{IssueCode, ValidationIssue};
use std::collections::HashMap;

pub fn check(ctx: &PassContext<'_, '_>, issues: &mut Vec<ValidationIssue>) {
    // height bits -> (first story id, already reported)
    let mut heights: HashMap<u64, (&str, bool)> = HashMap::new();

    for story in ctx.snapshot.stories() {
        if let Some(height) = story.height {
            match heights.get_mut(&height_key(height)) {
                Some((first, reported)) if !*reported => {
                    *reported = true;
                    issues.push(
                        ValidationIssue::warning(
                            IssueCode::DuplicateStoryHeight,
                            "StbStory",
                            format!(
                                "Story '{}' has the same height ({} mm) as story '{}'",
                                story.id,
                                mm(height),
                                first
                            ),
                        )
                        .with_element_id(&story.id)
                        .with_attribute("height")
                        .with_value(height.to_string())
                        .with_expected("unique story height")
                        .with_repair(format!("Keep story '{}' and drop later duplicates", first)),
                    );
                }
                Some(_) => {}
                None => {
                    heights.insert(height_key(height), (story.id.as_str(), false));
                }
            }
        }

        let unnamed = story.name.as_deref().map(str::trim).map_or(true, str::is_empty);
        if unnamed {
            issues.push(
                ValidationIssue::warning(
                    IssueCode::MissingStoryName,
                    "StbStory",
                    format!("Story '{}' has no name", story.id),
                )
                .with_element_id(&story.id)
                .with_attribute("name")
                .with_expected("non-empty story name")
                .with_repair(format!("Name the story '{}'", synthesized_story_name(&story.id))),
            );
        }
    }
}

/// Name given to an unnamed story by the repair engine
pub(crate) fn synthesized_story_name(id: &str) -> String {
    format!("Story {}", id)
}

/// Hash key for a height; folds -0.0 into 0.0
pub(crate) fn height_key(value: f64) -> u64 {
    (value + 0.0).to_bits()
}
