//! Auto-repair command: load, validate, repair, revalidate, export

use super::load_rules;
use anyhow::{bail, Result};
use stb_model::{compute_document_diff, save_document_string};
use stb_validate::{format_repair_report, Category, RepairOptions, ValidationRules};
use stb_workflow::Workflow;
use std::path::{Path, PathBuf};

pub struct RepairArgs {
    pub file: String,
    pub dry_run: bool,
    pub output: Option<String>,
    pub output_diff: bool,
    pub no_remove: bool,
    pub no_defaults: bool,
    pub skip_category: Vec<String>,
    pub rules: Option<String>,
}

pub fn run(args: RepairArgs) -> Result<()> {
    let path = Path::new(&args.file);
    let rules = load_rules(path, args.rules.as_deref())?;
    let options = repair_options(&args, &rules)?;

    let mut workflow = Workflow::new().with_rules(rules);

    let report = workflow.load_and_validate(path)?;
    println!("Before repair: {}", report.summary());
    if report.repairable_issues().is_empty() {
        println!("  Nothing to repair.");
        if !report.is_valid() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let repair = workflow.execute_auto_repair(&options)?;
    println!();
    if args.dry_run {
        println!("Dry run: nothing will be written.");
    }
    print!("{}", format_repair_report(repair));

    let revalidated = workflow.revalidate_repaired()?;
    let still_invalid = !revalidated.is_valid();
    println!("After repair: {}", revalidated.summary());

    if args.output_diff {
        if let (Some(before), Some(after)) =
            (workflow.original_document(), workflow.working_document())
        {
            let diff = compute_document_diff(
                &save_document_string(before)?,
                &save_document_string(after)?,
            );
            println!("\nDiff:");
            print!("{}", diff);
        }
    }

    if !args.dry_run {
        let output = args
            .output
            .map(PathBuf::from)
            .unwrap_or_else(|| repaired_path(path));
        workflow.export(&output)?;
        println!("\nRepaired model saved to {}", output.display());
    }

    if still_invalid {
        std::process::exit(1);
    }

    Ok(())
}

/// Flags plus the thresholds repair shares with validation
fn repair_options(args: &RepairArgs, rules: &ValidationRules) -> Result<RepairOptions> {
    let mut skip_categories = Vec::new();
    for name in &args.skip_category {
        match Category::parse(name) {
            Some(category) => skip_categories.push(category),
            None => bail!(
                "unknown category '{}'; valid values: structure, reference, data, geometry, duplicate",
                name
            ),
        }
    }

    Ok(RepairOptions {
        remove_invalid: !args.no_remove,
        use_defaults: !args.no_defaults,
        skip_categories,
        clamp_limit: rules.coordinate_magnitude_limit,
        min_member_length: rules.min_member_length,
        ..RepairOptions::default()
    })
}

/// `model.toml` → `model_repaired.toml`, next to the source
fn repaired_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let name = match source.extension() {
        Some(ext) => format!("{}_repaired.{}", stem, ext.to_string_lossy()),
        None => format!("{}_repaired", stem),
    };
    source.with_file_name(name)
}
