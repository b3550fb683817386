//! CLI command implementations

pub mod repair;
pub mod validate;

use anyhow::{Context, Result};
use stb_validate::ValidationRules;
use std::path::Path;

/// Rules from `--rules`, else `stb-rules.toml` beside the model, else defaults
pub fn load_rules(model: &Path, rules: Option<&str>) -> Result<ValidationRules> {
    match rules {
        Some(path) => ValidationRules::load_file(path)
            .with_context(|| format!("failed to load rules from {}", path)),
        None => {
            let dir = model.parent().unwrap_or_else(|| Path::new("."));
            Ok(ValidationRules::load_from_directory(dir)?)
        }
    }
}
