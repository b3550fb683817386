//! STB CLI - Validate and auto-repair ST-Bridge structural models

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{repair, validate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stb")]
#[command(about = "Validation and auto-repair for ST-Bridge structural models", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); STB_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a model and print the report
    Validate {
        /// Path to model file
        file: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Keep Info-level issues in the report
        #[arg(long)]
        include_info: bool,

        /// Skip node and section reference checks
        #[arg(long)]
        no_references: bool,

        /// Skip member length checks
        #[arg(long)]
        no_geometry: bool,

        /// Skip section dimension checks
        #[arg(long)]
        no_sections: bool,

        /// Rules file (default: stb-rules.toml next to the model)
        #[arg(long)]
        rules: Option<String>,
    },

    /// Repair a model and save the result
    Repair {
        /// Path to model file
        file: String,

        /// Preview repairs without writing
        #[arg(long)]
        dry_run: bool,

        /// Output path (default: <name>_repaired.<ext>)
        #[arg(short, long)]
        output: Option<String>,

        /// Show diff of changes
        #[arg(long)]
        output_diff: bool,

        /// Never remove elements, stories or axes
        #[arg(long)]
        no_remove: bool,

        /// Never substitute default values or names
        #[arg(long)]
        no_defaults: bool,

        /// Leave issues of this category alone (repeatable)
        #[arg(long)]
        skip_category: Vec<String>,

        /// Rules file (default: stb-rules.toml next to the model)
        #[arg(long)]
        rules: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "warn,stb_validate=debug,stb_workflow=debug",
        _ => "warn,stb_validate=trace,stb_workflow=trace",
    };
    let filter = EnvFilter::try_from_env("STB_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate {
            file,
            format,
            include_info,
            no_references,
            no_geometry,
            no_sections,
            rules,
        } => validate::run(validate::ValidateArgs {
            file,
            format,
            include_info,
            no_references,
            no_geometry,
            no_sections,
            rules,
        }),
        Commands::Repair {
            file,
            dry_run,
            output,
            output_diff,
            no_remove,
            no_defaults,
            skip_category,
            rules,
        } => repair::run(repair::RepairArgs {
            file,
            dry_run,
            output,
            output_diff,
            no_remove,
            no_defaults,
            skip_category,
            rules,
        }),
    }
}
