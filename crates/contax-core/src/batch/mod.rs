//! Batch orchestration across many documents.
//!
//! Documents run either one at a time or in fixed-size chunks with a
//! bounded number of concurrent workers. A failing document is recorded
//! and never stops its siblings or later chunks. Each extraction runs on
//! the blocking pool under a timeout, and transient failures are retried
//! with exponential backoff.

mod result;

pub use result::{BatchResult, BatchSummary, DocumentFailure};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{info, warn};

use crate::contact::{ContactPipeline, DocumentResult};
use crate::error::ExtractionError;
use crate::extract::DocumentExtractor;
use crate::models::config::{BatchConfig, ContaxConfig, ExtractionConfig};

/// How documents are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// One document at a time, in input order.
    Sequential,
    /// Chunks of `batch_size` documents, `max_workers` at a time.
    #[default]
    Concurrent,
}

/// Receives each document's outcome as soon as it is known.
///
/// Used to persist results while the batch is still running.
pub trait ResultSink {
    /// Called once per successfully processed document.
    fn accept(&mut self, result: &DocumentResult) -> crate::Result<()>;

    /// Called once per failed document.
    fn failed(&mut self, _failure: &DocumentFailure) {}
}

impl<F> ResultSink for F
where
    F: FnMut(&DocumentResult) -> crate::Result<()>,
{
    fn accept(&mut self, result: &DocumentResult) -> crate::Result<()> {
        self(result)
    }
}

/// Runs the contact pipeline over a list of documents.
#[derive(Clone)]
pub struct BatchOrchestrator {
    pipeline: Arc<ContactPipeline>,
    extractor: Arc<dyn DocumentExtractor>,
    batch: BatchConfig,
    extraction: ExtractionConfig,
}

impl BatchOrchestrator {
    pub fn new(config: &ContaxConfig, extractor: Arc<dyn DocumentExtractor>) -> Self {
        Self {
            pipeline: Arc::new(ContactPipeline::new(config)),
            extractor,
            batch: config.batch.clone(),
            extraction: config.extraction.clone(),
        }
    }

    /// Process every path in the given mode.
    pub async fn run(
        &self,
        paths: &[PathBuf],
        mode: BatchMode,
        sink: Option<&mut dyn ResultSink>,
    ) -> BatchResult {
        match mode {
            BatchMode::Sequential => self.run_sequential(paths, sink).await,
            BatchMode::Concurrent => self.run_concurrent(paths, sink).await,
        }
    }

    /// Process documents one at a time. Results keep input order.
    pub async fn run_sequential(
        &self,
        paths: &[PathBuf],
        mut sink: Option<&mut dyn ResultSink>,
    ) -> BatchResult {
        let mut result = BatchResult::new(paths.len());
        info!("Processing {} documents sequentially", paths.len());

        for path in paths {
            let outcome = self.process_one(path).await;
            self.record(&mut result, path, outcome, &mut sink);
        }

        info!("{}", result.summary());
        result
    }

    /// Process documents in chunks with a bounded worker pool.
    ///
    /// Results arrive in completion order; see [`BatchResult::sort_by_file_name`].
    pub async fn run_concurrent(
        &self,
        paths: &[PathBuf],
        mut sink: Option<&mut dyn ResultSink>,
    ) -> BatchResult {
        let mut result = BatchResult::new(paths.len());
        let batch_size = self.batch.batch_size.max(1);
        let total_batches = paths.len().div_ceil(batch_size);

        for (batch_idx, chunk) in paths.chunks(batch_size).enumerate() {
            let start = batch_idx * batch_size;
            info!(
                "Processing batch {}/{}: files {}-{}",
                batch_idx + 1,
                total_batches,
                start + 1,
                start + chunk.len()
            );

            let semaphore = Arc::new(Semaphore::new(self.batch.max_workers.max(1)));
            let mut tasks = JoinSet::new();
            let mut pending: HashMap<Id, PathBuf> = HashMap::new();

            for path in chunk {
                let this = self.clone();
                let semaphore = semaphore.clone();
                let owned = path.clone();
                let handle = tasks.spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    this.process_one(&owned).await
                });
                pending.insert(handle.id(), path.clone());
            }

            while let Some(joined) = tasks.join_next_with_id().await {
                match joined {
                    Ok((id, outcome)) => {
                        let path = pending.remove(&id).unwrap_or_default();
                        self.record(&mut result, &path, outcome, &mut sink);
                    }
                    Err(e) => self.record_join_error(&mut result, &mut pending, e, &mut sink),
                }
            }

            info!("Finished batch {}/{}", batch_idx + 1, total_batches);
        }

        info!("{}", result.summary());
        result
    }

    /// Extract and process one document with timeout and retries.
    async fn process_one(&self, path: &Path) -> Result<DocumentResult, ExtractionError> {
        let timeout = self.extraction.timeout();
        let mut backoff = self.extraction.retry_backoff();
        let mut attempt = 0;

        loop {
            let pipeline = self.pipeline.clone();
            let extractor = self.extractor.clone();
            let owned = path.to_path_buf();
            let task = tokio::task::spawn_blocking(move || {
                pipeline.process_document(&*extractor, &owned)
            });

            let outcome = match tokio::time::timeout(timeout, task).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => Err(ExtractionError::Worker(e.to_string())),
                Err(_) => Err(ExtractionError::Timeout(timeout)),
            };

            match outcome {
                Err(e) if e.is_transient() && attempt < self.extraction.max_retries => {
                    attempt += 1;
                    warn!(
                        "{}: {} (retry {}/{} in {:?})",
                        path.display(),
                        e,
                        attempt,
                        self.extraction.max_retries,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                outcome => return outcome,
            }
        }
    }

    /// Record a task that died before returning an outcome.
    fn record_join_error(
        &self,
        result: &mut BatchResult,
        pending: &mut HashMap<Id, PathBuf>,
        error: JoinError,
        sink: &mut Option<&mut dyn ResultSink>,
    ) {
        let path = pending.remove(&error.id()).unwrap_or_default();
        warn!("Batch task for {} failed: {}", path.display(), error);
        let failure =
            DocumentFailure::new(&path, &ExtractionError::Worker(error.to_string()).into());
        if let Some(sink) = sink.as_deref_mut() {
            sink.failed(&failure);
        }
        result.failures.push(failure);
    }

    /// Hand an outcome to the sink and fold it into the batch result.
    fn record(
        &self,
        result: &mut BatchResult,
        path: &Path,
        outcome: Result<DocumentResult, ExtractionError>,
        sink: &mut Option<&mut dyn ResultSink>,
    ) {
        let document = match outcome {
            Ok(document) => document,
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                let failure = DocumentFailure::new(path, &e.into());
                if let Some(sink) = sink.as_deref_mut() {
                    sink.failed(&failure);
                }
                result.failures.push(failure);
                return;
            }
        };

        if let Some(sink) = sink.as_deref_mut() {
            if let Err(e) = sink.accept(&document) {
                warn!("Could not save results for {}: {}", document.file_name, e);
                let failure = DocumentFailure::new(path, &e);
                sink.failed(&failure);
                result.failures.push(failure);
                return;
            }
        }

        if self.batch.retain_records {
            result.documents.push(document);
        } else {
            result.push_released(document);
        }
    }
}
