//! Per-document contact pipeline.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::assembler::assemble;
use super::validator::{ValidationStats, Validator};
use crate::error::ExtractionError;
use crate::extract::{normalize_entities, DocumentExtractor, ExtractedDocument, ProviderEntity};
use crate::models::config::{AssemblyStrategy, ContaxConfig, ProcessorConfig};
use crate::models::record::{CleanRecord, Entity, RawRecord};
use crate::models::snapshot::{
    DocumentMetadata, DocumentSnapshots, FieldCounts, PostProcessingSnapshot, PreProcessingRecord,
    PreProcessingSnapshot, ProcessingSummary,
};

/// Everything the pipeline produced for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResult {
    pub file_name: String,
    pub processed_at: DateTime<Utc>,
    pub entities: Vec<Entity>,
    pub raw_records: Vec<RawRecord>,
    pub clean_records: Vec<CleanRecord>,
    pub raw_text: String,
    pub metadata: DocumentMetadata,
    pub stats: ValidationStats,
    /// Raw record count, kept when the records themselves are released.
    pub raw_count: usize,
    /// Clean record count, kept when the records themselves are released.
    pub clean_count: usize,
}

impl DocumentResult {
    pub fn summary(&self) -> ProcessingSummary {
        ProcessingSummary::new(self.raw_count, self.clean_count, &self.stats)
    }

    pub fn pre_processing_snapshot(&self) -> PreProcessingSnapshot {
        let mut entity_types: Vec<String> =
            self.entities.iter().map(|e| e.entity_type.clone()).collect();
        entity_types.sort();
        entity_types.dedup();

        PreProcessingSnapshot {
            file_name: self.file_name.clone(),
            processing_timestamp: self.processed_at,
            raw_records: self
                .raw_records
                .iter()
                .map(|r| PreProcessingRecord::new(r, &self.file_name))
                .collect(),
            entities: self.entities.clone(),
            total_entities: self.entities.len(),
            entity_types,
            raw_text: self.raw_text.clone(),
            metadata: self.metadata.clone(),
        }
    }

    pub fn post_processing_snapshot(&self) -> PostProcessingSnapshot {
        PostProcessingSnapshot {
            file_name: self.file_name.clone(),
            processing_timestamp: self.processed_at,
            raw_records: self.raw_records.clone(),
            filtered_records: self.clean_records.clone(),
            summary: self.summary(),
            field_counts: FieldCounts::from_records(&self.raw_records),
            metadata: self.metadata.clone(),
        }
    }

    pub fn snapshots(&self) -> DocumentSnapshots {
        DocumentSnapshots {
            pre_processing: self.pre_processing_snapshot(),
            post_processing: self.post_processing_snapshot(),
        }
    }

    /// Drop entities, records and text, keeping counts and statistics.
    pub fn release_records(&mut self) {
        self.entities = Vec::new();
        self.raw_records = Vec::new();
        self.clean_records = Vec::new();
        self.raw_text = String::new();
    }
}

/// Normalize, assemble and validate the entities of one document.
///
/// Stateless across documents and safe to share between workers.
#[derive(Debug, Clone)]
pub struct ContactPipeline {
    strategy: AssemblyStrategy,
    validator: Validator,
    processor: ProcessorConfig,
}

impl Default for ContactPipeline {
    fn default() -> Self {
        Self::new(&ContaxConfig::default())
    }
}

impl ContactPipeline {
    pub fn new(config: &ContaxConfig) -> Self {
        Self {
            strategy: config.validation.assembly,
            validator: Validator::from_config(&config.validation),
            processor: config.processor.clone(),
        }
    }

    /// Run the pipeline over provider entities that have no accompanying text.
    pub fn process_entities(&self, file_name: &str, entities: &[ProviderEntity]) -> DocumentResult {
        self.process_extracted(
            file_name,
            ExtractedDocument {
                entities: entities.to_vec(),
                ..ExtractedDocument::default()
            },
        )
    }

    /// Run the pipeline over a completed extraction.
    pub fn process_extracted(&self, file_name: &str, document: ExtractedDocument) -> DocumentResult {
        let entities = normalize_entities(&document.entities);
        if entities.is_empty() {
            warn!("{}: no entities found", file_name);
        }

        let raw_records = assemble(&entities, self.strategy);
        let (clean_records, stats) = self.validator.validate_all(&raw_records);

        info!(
            "{}: {} entities, {} raw records, {} clean records",
            file_name,
            entities.len(),
            raw_records.len(),
            clean_records.len()
        );

        DocumentResult {
            file_name: file_name.to_string(),
            processed_at: Utc::now(),
            raw_count: raw_records.len(),
            clean_count: clean_records.len(),
            entities,
            raw_records,
            clean_records,
            raw_text: document.text.unwrap_or_default(),
            metadata: DocumentMetadata::new(&self.processor, document.page_count),
            stats,
        }
    }

    /// Extract a document and run the pipeline over it.
    pub fn process_document(
        &self,
        extractor: &dyn DocumentExtractor,
        path: &Path,
    ) -> Result<DocumentResult, ExtractionError> {
        let document = extractor.extract(path)?;
        Ok(self.process_extracted(&display_name(path), document))
    }
}

/// File name used to key a document in exports.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
