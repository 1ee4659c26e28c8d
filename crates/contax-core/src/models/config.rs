//! Configuration structures for the contact pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ContaxError, Result};
use crate::models::record::Field;

/// Main configuration for contax.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContaxConfig {
    /// Identity of the extraction processor.
    pub processor: ProcessorConfig,

    /// Extraction call configuration.
    pub extraction: ExtractionConfig,

    /// Record assembly and validation configuration.
    pub validation: ValidationConfig,

    /// Batch orchestration configuration.
    pub batch: BatchConfig,

    /// Duplicate reporting configuration.
    pub duplicates: DuplicateConfig,

    /// Export configuration.
    pub output: OutputConfig,
}

/// Identity of the document extraction processor.
///
/// Passed explicitly to whatever performs the extraction call and copied
/// into snapshot metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Cloud project hosting the processor.
    pub project_id: String,

    /// Processor region.
    pub location: String,

    /// Processor identifier.
    pub processor_id: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: "us".to_string(),
            processor_id: String::new(),
        }
    }
}

/// Extraction call configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Directory holding saved service responses (default: next to each document).
    pub responses_dir: Option<PathBuf>,

    /// Per-document timeout for the extraction call, in seconds.
    pub timeout_secs: u64,

    /// Retries after a transient failure.
    pub max_retries: u32,

    /// Initial backoff between retries, doubled on each attempt.
    pub retry_backoff_ms: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            responses_dir: None,
            timeout_secs: 120,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl ExtractionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// How per-type entity lists are grouped into records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyStrategy {
    /// Pair the i-th entity of every type.
    #[default]
    Positional,
    /// Group by page position, falling back to positional when anchors are missing.
    Layout,
}

/// Record assembly and validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// An address must contain a digit within this many leading characters.
    pub address_digit_window: usize,

    /// Record assembly strategy.
    pub assembly: AssemblyStrategy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            address_digit_window: 15,
            assembly: AssemblyStrategy::Positional,
        }
    }
}

/// Batch orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Documents per chunk in concurrent mode.
    pub batch_size: usize,

    /// Concurrent extraction workers within a chunk.
    pub max_workers: usize,

    /// Keep entities and records in the batch result after the sink saw them.
    pub retain_records: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 25,
            max_workers: 4,
            retain_records: true,
        }
    }
}

/// Duplicate reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    /// Produce a duplicate report after a batch.
    pub enabled: bool,

    /// Field used as the duplicate key.
    pub key_field: Field,

    /// Leave records with an empty key out of the report.
    pub skip_empty_keys: bool,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key_field: Field::Mobile,
            skip_empty_keys: false,
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Add `file_name` and `extraction_date` columns to tabular exports.
    pub include_metadata: bool,
}

impl ContaxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch.batch_size == 0 {
            return Err(ContaxError::Config("batch.batch_size must be at least 1".into()));
        }
        if self.batch.max_workers == 0 {
            return Err(ContaxError::Config("batch.max_workers must be at least 1".into()));
        }
        if self.extraction.timeout_secs == 0 {
            return Err(ContaxError::Config("extraction.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}
