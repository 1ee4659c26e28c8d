//! Process command - build contact records from a single document.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use contax_core::{BatchOrchestrator, DocumentExtractor, DocumentResult, ResponseFileExtractor};

use crate::output::{document_table, table_to_string};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input document (PDF) or saved extraction response (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Directory holding saved extraction responses
    #[arg(long)]
    responses_dir: Option<PathBuf>,

    /// Output the assembled records before validation
    #[arg(long)]
    raw: bool,

    /// Add file name and extraction date columns to CSV output
    #[arg(long)]
    include_metadata: bool,

    /// Print the processing summary to stderr
    #[arg(long)]
    show_summary: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON list of records
    Json,
    /// CSV table of records
    Csv,
    /// Pre- and post-processing snapshots
    Snapshot,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if let Some(dir) = &args.responses_dir {
        config.extraction.responses_dir = Some(dir.clone());
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let extractor: Arc<dyn DocumentExtractor> =
        Arc::new(ResponseFileExtractor::from_config(&config.extraction));
    let orchestrator = BatchOrchestrator::new(&config, extractor);

    let mut result = orchestrator
        .run_sequential(std::slice::from_ref(&args.input), None)
        .await;

    if let Some(failure) = result.failures.pop() {
        anyhow::bail!("Processing failed ({}): {}", failure.kind, failure.message);
    }
    let Some(document) = result.documents.pop() else {
        anyhow::bail!("No result produced for {}", args.input.display());
    };

    let include_metadata = args.include_metadata || config.output.include_metadata;
    let output = format_document(&document, args.format, args.raw, include_metadata)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    if args.show_summary {
        let summary = document.summary();
        eprintln!(
            "{} {} raw records, {} clean records ({})",
            style("ℹ").blue(),
            summary.total_raw_records,
            summary.total_filtered_records,
            summary.success_rate
        );
        for (reason, count) in &summary.rejected {
            eprintln!("   rejected {}: {}", reason, count);
        }
        if summary.duplicates_dropped > 0 {
            eprintln!("   duplicates dropped: {}", summary.duplicates_dropped);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_document(
    document: &DocumentResult,
    format: OutputFormat,
    raw: bool,
    include_metadata: bool,
) -> anyhow::Result<String> {
    let documents = std::slice::from_ref(document);

    match format {
        OutputFormat::Json if raw => Ok(serde_json::to_string_pretty(&document.raw_records)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&document.clean_records)?),
        OutputFormat::Csv => {
            let table = if raw {
                document_table(documents, |d| d.raw_records.as_slice(), include_metadata)
            } else {
                document_table(documents, |d| d.clean_records.as_slice(), include_metadata)
            };
            table_to_string(&table)
        }
        OutputFormat::Snapshot => Ok(serde_json::to_string_pretty(&document.snapshots())?),
    }
}
