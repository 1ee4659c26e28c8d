//! Batch processing command for multiple documents.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use contax_core::batch::DocumentFailure;
use contax_core::export::{build_table, duplicate_columns};
use contax_core::models::config::DuplicateConfig;
use contax_core::{
    BatchMode, BatchOrchestrator, BatchResult, ContaxError, DocumentExtractor, DocumentResult,
    Field, ResponseFileExtractor, ResultSink,
};

use crate::output::{document_table, write_json, write_pairs, write_table};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Process documents one at a time
    #[arg(long)]
    sequential: bool,

    /// Number of parallel workers (overrides config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Documents per batch (overrides config)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Directory holding saved extraction responses
    #[arg(long)]
    responses_dir: Option<PathBuf>,

    /// Add file name and extraction date columns to CSV output
    #[arg(long)]
    include_metadata: bool,

    /// Also write `<file>.filtered.csv` for each document as it completes
    #[arg(long)]
    save_per_file: bool,

    /// Field used to detect duplicates (overrides config)
    #[arg(short, long)]
    key: Option<Field>,

    /// Skip the duplicate report
    #[arg(long)]
    no_duplicates: bool,
}

/// Writes per-document output while the batch runs and drives the progress bar.
struct ProgressSink {
    progress: ProgressBar,
    per_file_dir: Option<PathBuf>,
    include_metadata: bool,
}

impl ProgressSink {
    fn save_filtered(&self, dir: &Path, document: &DocumentResult) -> anyhow::Result<()> {
        let table = document_table(
            std::slice::from_ref(document),
            |d| d.clean_records.as_slice(),
            self.include_metadata,
        );
        let path = dir.join(format!("{}.filtered.csv", document.file_name));
        if !write_table(&path, &table)? {
            debug!("{}: no clean records to save", document.file_name);
        }
        Ok(())
    }
}

impl ResultSink for ProgressSink {
    fn accept(&mut self, document: &DocumentResult) -> contax_core::Result<()> {
        if let Some(dir) = &self.per_file_dir {
            self.save_filtered(dir, document)
                .map_err(|e| ContaxError::Sink(e.to_string()))?;
        }

        // A failed write is counted by `failed`.
        self.progress.inc(1);
        self.progress.set_message(document.file_name.clone());
        Ok(())
    }

    fn failed(&mut self, failure: &DocumentFailure) {
        self.progress.inc(1);
        self.progress.println(format!(
            "{} {}: {}",
            style("✗").red(),
            failure.file_name,
            failure.message
        ));
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if let Some(dir) = &args.responses_dir {
        config.extraction.responses_dir = Some(dir.clone());
    }
    if let Some(jobs) = args.jobs {
        config.batch.max_workers = jobs;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch.batch_size = batch_size;
    }
    if let Some(key) = args.key {
        config.duplicates.key_field = key;
    }
    if args.no_duplicates {
        config.duplicates.enabled = false;
    }
    config.validate()?;

    let include_metadata = args.include_metadata || config.output.include_metadata;

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.inputs.join(", "));
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("=>-"),
    );

    let mut sink = ProgressSink {
        progress: progress.clone(),
        per_file_dir: args.save_per_file.then(|| args.output_dir.clone()),
        include_metadata,
    };

    let extractor: Arc<dyn DocumentExtractor> =
        Arc::new(ResponseFileExtractor::from_config(&config.extraction));
    let orchestrator = BatchOrchestrator::new(&config, extractor);
    let mode = if args.sequential {
        BatchMode::Sequential
    } else {
        BatchMode::Concurrent
    };

    let mut result = orchestrator.run(&files, mode, Some(&mut sink)).await;
    progress.finish_with_message("Complete");
    result.sort_by_file_name();

    write_outputs(&result, &args.output_dir, &config.duplicates, include_metadata)?;

    let summary = result.summary();
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        summary.submitted,
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(summary.succeeded).green(),
        style(summary.failed).red()
    );
    println!(
        "   {} raw records, {} clean records ({})",
        summary.raw_records, summary.clean_records, summary.success_rate
    );
    println!(
        "{} Results written to {}",
        style("✓").green(),
        args.output_dir.display()
    );

    if !result.failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for failure in &result.failures {
            println!("  - {} [{}]: {}", failure.file_name, failure.kind, failure.message);
        }
    }

    Ok(())
}

/// Expand glob patterns into a sorted, de-duplicated list of documents.
///
/// Only PDFs and saved JSON responses are kept. A response sitting next to
/// a matched PDF of the same stem belongs to that PDF and is dropped.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        for entry in glob(input)? {
            match entry {
                Ok(path) if path.is_file() && is_document(&path) => files.push(path),
                Ok(path) => debug!("Skipping {}", path.display()),
                Err(e) => warn!("Cannot read {}: {}", e.path().display(), e.error()),
            }
        }
    }

    files.sort();
    files.dedup();

    let pdfs: HashSet<PathBuf> = files
        .iter()
        .filter(|p| has_extension(p, "pdf"))
        .map(|p| p.with_extension(""))
        .collect();
    files.retain(|p| !has_extension(p, "json") || !pdfs.contains(&p.with_extension("")));

    Ok(files)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn is_document(path: &Path) -> bool {
    has_extension(path, "pdf") || has_extension(path, "json")
}

fn write_outputs(
    result: &BatchResult,
    output_dir: &Path,
    duplicates: &DuplicateConfig,
    include_metadata: bool,
) -> anyhow::Result<()> {
    if result.records_released {
        println!(
            "{} Records were not retained; skipping raw_data.csv, filtered_data.csv and session.json",
            style("ℹ").blue()
        );
    } else {
        let raw = document_table(&result.documents, |d| d.raw_records.as_slice(), include_metadata);
        if !write_table(&output_dir.join("raw_data.csv"), &raw)? {
            warn!("No raw records to save");
        }

        let filtered = document_table(
            &result.documents,
            |d| d.clean_records.as_slice(),
            include_metadata,
        );
        if !write_table(&output_dir.join("filtered_data.csv"), &filtered)? {
            warn!("No filtered records to save");
        }
    }

    if duplicates.enabled {
        let rows = result.duplicates(duplicates);
        let table = build_table(&rows, &duplicate_columns(false));
        if write_table(&output_dir.join("duplicates.csv"), &table)? {
            println!(
                "{} Found {} records sharing a {}",
                style("!").yellow(),
                rows.len(),
                duplicates.key_field
            );
        }
    }

    write_pairs(
        &output_dir.join("summary.csv"),
        ["metric", "value"],
        &result.summary().rows(),
    )?;

    if !result.failures.is_empty() {
        let mut wtr = csv::Writer::from_path(output_dir.join("errors.csv"))?;
        wtr.write_record(["file_name", "kind", "message", "path"])?;
        for failure in &result.failures {
            let path = failure.path.display().to_string();
            wtr.write_record([
                failure.file_name.as_str(),
                failure.kind.as_str(),
                failure.message.as_str(),
                path.as_str(),
            ])?;
        }
        wtr.flush()?;
    }

    if !result.records_released {
        write_json(&output_dir.join("session.json"), &result.session())?;
    }

    Ok(())
}
