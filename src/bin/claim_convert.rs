//! Headless converter: raw claim export in, reporting template out.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use claim_template::data::loader;
use claim_template::data::pipeline;
use claim_template::data::variant::SchemaVariant;
use claim_template::export::{self, DEFAULT_EXPORT_NAME};

#[derive(Parser, Debug)]
#[command(name = "claim-convert", about = "Convert a raw claim export into the reporting template")]
struct Cli {
    /// Raw export (.csv)
    input: PathBuf,

    /// Raw layout: standard, pascal, extended, or auto to detect from the header
    #[arg(short, long, default_value = "auto")]
    variant: String,

    /// Output file (.xlsx or .csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the run report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Only report; do not write the output file
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let raw = loader::load_file(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;

    let outcome = if cli.variant.eq_ignore_ascii_case("auto") {
        pipeline::run_detected(&raw)?
    } else {
        let variant = SchemaVariant::by_name(&cli.variant).ok_or_else(|| {
            let names: Vec<&str> = SchemaVariant::all().iter().map(|v| v.name).collect();
            anyhow!("unknown layout '{}', expected one of: auto, {}", cli.variant, names.join(", "))
        })?;
        pipeline::run(&raw, variant)?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report())?);
    } else {
        println!(
            "Layout '{}': {} rows read, {} ready, {} in template",
            outcome.variant.name,
            outcome.input_rows,
            outcome.ready_rows,
            outcome.table.len()
        );
        if !outcome.duplicates.is_empty() {
            println!("Duplicated Claim No values:");
            for key in &outcome.duplicates.keys {
                println!("  {key}");
            }
        }
        for warning in &outcome.warnings {
            println!("Warning: {warning}");
        }
        println!("Claim Summary:");
        for line in outcome.summary.lines() {
            println!("- {line}");
        }
    }

    if !cli.dry_run {
        let output = cli
            .output
            .unwrap_or_else(|| PathBuf::from(format!("{DEFAULT_EXPORT_NAME}.xlsx")));
        export::export_file(&outcome.table, &output)?;
        if !cli.json {
            println!("Saved {}", output.display());
        }
    }

    Ok(())
}
