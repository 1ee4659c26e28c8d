//! Batch outcome aggregation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::contact::{display_name, find_duplicates, DocumentResult, ValidationStats};
use crate::error::ContaxError;
use crate::models::config::DuplicateConfig;
use crate::models::record::{CleanRecord, DuplicateRecord, RawRecord};
use crate::models::snapshot::{success_rate, Session};

/// A document that produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub file_name: String,
    pub path: PathBuf,
    /// Short machine-readable error kind, e.g. `timeout` or `unreadable`.
    pub kind: String,
    pub message: String,
}

impl DocumentFailure {
    pub fn new(path: &Path, error: &ContaxError) -> Self {
        let kind = match error {
            ContaxError::Extraction(e) => e.kind(),
            ContaxError::Sink(_) | ContaxError::Io(_) => "sink",
            _ => "internal",
        };

        let file_name = if path.as_os_str().is_empty() {
            "unknown".to_string()
        } else {
            display_name(path)
        };

        Self {
            file_name,
            path: path.to_path_buf(),
            kind: kind.to_string(),
            message: error.to_string(),
        }
    }
}

/// Counts for a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub raw_records: usize,
    pub clean_records: usize,
    pub success_rate: String,
    pub validation: ValidationStats,
}

impl BatchSummary {
    /// Metric/value rows for a flat summary export.
    pub fn rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("submitted".to_string(), self.submitted.to_string()),
            ("succeeded".to_string(), self.succeeded.to_string()),
            ("failed".to_string(), self.failed.to_string()),
            ("raw_records".to_string(), self.raw_records.to_string()),
            ("clean_records".to_string(), self.clean_records.to_string()),
            ("success_rate".to_string(), self.success_rate.clone()),
            (
                "duplicates_dropped".to_string(),
                self.validation.duplicates_dropped.to_string(),
            ),
        ];
        for (reason, count) in &self.validation.rejected {
            rows.push((format!("rejected_{}", reason), count.to_string()));
        }
        rows
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} submitted, {} succeeded, {} failed; {} raw records, {} clean records ({})",
            self.submitted,
            self.succeeded,
            self.failed,
            self.raw_records,
            self.clean_records,
            self.success_rate
        )
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Number of documents handed to the run.
    pub submitted: usize,
    /// Processed documents, in completion order.
    pub documents: Vec<DocumentResult>,
    pub failures: Vec<DocumentFailure>,
    /// Set when documents dropped their records after processing.
    pub records_released: bool,
    /// Clean records of released documents, tagged with their file name,
    /// kept for the cross-document duplicate report.
    pub released_clean: Vec<(String, CleanRecord)>,
}

impl BatchResult {
    pub fn new(submitted: usize) -> Self {
        Self {
            submitted,
            ..Self::default()
        }
    }

    pub fn summary(&self) -> BatchSummary {
        let raw_records = self.documents.iter().map(|d| d.raw_count).sum();
        let clean_records = self.documents.iter().map(|d| d.clean_count).sum();

        let mut validation = ValidationStats::default();
        for document in &self.documents {
            validation.merge(&document.stats);
        }

        BatchSummary {
            submitted: self.submitted,
            succeeded: self.documents.len(),
            failed: self.failures.len(),
            raw_records,
            clean_records,
            success_rate: success_rate(raw_records, clean_records),
            validation,
        }
    }

    /// Restore a stable order after a concurrent run.
    pub fn sort_by_file_name(&mut self) {
        self.documents.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        self.failures.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        self.released_clean.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Keep a document's clean records for duplicate reporting, then
    /// release everything but its counts.
    pub fn push_released(&mut self, mut document: DocumentResult) {
        let file_name = document.file_name.clone();
        self.released_clean.extend(
            document
                .clean_records
                .drain(..)
                .map(|record| (file_name.clone(), record)),
        );
        document.release_records();
        self.records_released = true;
        self.documents.push(document);
    }

    pub fn raw_records(&self) -> impl Iterator<Item = &RawRecord> {
        self.documents.iter().flat_map(|d| d.raw_records.iter())
    }

    /// Clean records of every document, including released ones.
    pub fn clean_records(&self) -> impl Iterator<Item = &CleanRecord> {
        self.documents
            .iter()
            .flat_map(|d| d.clean_records.iter())
            .chain(self.released_clean.iter().map(|(_, record)| record))
    }

    /// Duplicate report across every document's clean records.
    pub fn duplicates(&self, config: &DuplicateConfig) -> Vec<DuplicateRecord> {
        let records: Vec<CleanRecord> = self.clean_records().cloned().collect();
        find_duplicates(&records, config.key_field, config.skip_empty_keys)
    }

    /// Snapshots of every processed document.
    pub fn session(&self) -> Session {
        let mut session = Session::new(self.submitted);
        for document in &self.documents {
            session.insert(document.snapshots());
        }
        session
    }
}
