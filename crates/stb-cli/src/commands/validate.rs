//! Model validation command

use super::load_rules;
use anyhow::{Context, Result};
use stb_model::load_document;
use stb_validate::{
    format_validation_report, DimensionalSectionValidator, ValidationOptions, ValidationReport,
    Validator,
};
use std::path::Path;

pub struct ValidateArgs {
    pub file: String,
    pub format: String,
    pub include_info: bool,
    pub no_references: bool,
    pub no_geometry: bool,
    pub no_sections: bool,
    pub rules: Option<String>,
}

impl ValidateArgs {
    fn options(&self) -> ValidationOptions {
        ValidationOptions {
            validate_references: !self.no_references,
            validate_geometry: !self.no_geometry,
            validate_sections: !self.no_sections,
            include_info: self.include_info,
        }
    }
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let path = Path::new(&args.file);
    let rules = load_rules(path, args.rules.as_deref())?;
    let document =
        load_document(path).with_context(|| format!("failed to load {}", args.file))?;

    let sections = DimensionalSectionValidator::from_rules(&rules);
    let report = Validator::new(&rules, &sections, args.options()).validate(&document);

    if args.format == "json" {
        print_report_json(&report)?;
    } else {
        print!("{}", format_validation_report(&report));
    }

    if !report.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_report_json(report: &ValidationReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
