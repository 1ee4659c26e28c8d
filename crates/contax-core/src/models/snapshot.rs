//! Structured per-document exports.
//!
//! A document is exported twice: a pre-processing snapshot with what the
//! extraction service returned and how it was grouped, and a
//! post-processing snapshot with the validated outcome. Snapshots for a
//! run are combined into a [`Session`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contact::{Rejection, ValidationStats};
use crate::models::config::ProcessorConfig;
use crate::models::record::{CleanRecord, Entity, Field, RawRecord};

/// Processor identity and document facts shared by both snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub processor_id: String,
    pub project_id: String,
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

impl DocumentMetadata {
    pub fn new(processor: &ProcessorConfig, page_count: Option<u32>) -> Self {
        Self {
            processor_id: processor.processor_id.clone(),
            project_id: processor.project_id.clone(),
            location: processor.location.clone(),
            page_count,
        }
    }
}

/// A raw record flattened for review, with the name rejoined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreProcessingRecord {
    pub full_name: String,
    pub mobile: String,
    pub address: String,
    pub email: String,
    pub dateofbirth: String,
    pub landline: String,
    pub lastseen: String,
    pub file_name: String,
}

impl PreProcessingRecord {
    pub fn new(record: &RawRecord, file_name: &str) -> Self {
        let field = |f: Field| record.get(f).unwrap_or_default().to_string();
        Self {
            full_name: record.full_name(),
            mobile: field(Field::Mobile),
            address: field(Field::Address),
            email: field(Field::Email),
            dateofbirth: field(Field::DateOfBirth),
            landline: field(Field::Landline),
            lastseen: field(Field::LastSeen),
            file_name: file_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreProcessingSnapshot {
    pub file_name: String,
    pub processing_timestamp: DateTime<Utc>,
    pub raw_records: Vec<PreProcessingRecord>,
    pub entities: Vec<Entity>,
    pub total_entities: usize,
    /// Distinct entity types, sorted.
    pub entity_types: Vec<String>,
    pub raw_text: String,
    pub metadata: DocumentMetadata,
}

/// Record totals for one document or a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub total_raw_records: usize,
    pub total_filtered_records: usize,
    /// Filtered over raw, formatted like `"66.7%"`; `"0%"` without raw records.
    pub success_rate: String,
    #[serde(default)]
    pub rejected: BTreeMap<Rejection, usize>,
    #[serde(default)]
    pub duplicates_dropped: usize,
}

impl ProcessingSummary {
    pub fn new(total_raw: usize, total_filtered: usize, stats: &ValidationStats) -> Self {
        Self {
            total_raw_records: total_raw,
            total_filtered_records: total_filtered,
            success_rate: success_rate(total_raw, total_filtered),
            rejected: stats.rejected.clone(),
            duplicates_dropped: stats.duplicates_dropped,
        }
    }
}

pub fn success_rate(total_raw: usize, total_filtered: usize) -> String {
    if total_raw == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", total_filtered as f64 / total_raw as f64 * 100.0)
}

/// How many raw records carry a non-empty value for each field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCounts {
    pub names: usize,
    pub mobiles: usize,
    pub addresses: usize,
    pub emails: usize,
    pub dateofbirths: usize,
    pub landlines: usize,
    pub lastseens: usize,
}

impl FieldCounts {
    pub fn from_records(records: &[RawRecord]) -> Self {
        let count = |field: Field| records.iter().filter(|r| r.has(field)).count();
        Self {
            names: count(Field::FirstName),
            mobiles: count(Field::Mobile),
            addresses: count(Field::Address),
            emails: count(Field::Email),
            dateofbirths: count(Field::DateOfBirth),
            landlines: count(Field::Landline),
            lastseens: count(Field::LastSeen),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostProcessingSnapshot {
    pub file_name: String,
    pub processing_timestamp: DateTime<Utc>,
    pub raw_records: Vec<RawRecord>,
    pub filtered_records: Vec<CleanRecord>,
    pub summary: ProcessingSummary,
    pub field_counts: FieldCounts,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshots {
    pub pre_processing: PreProcessingSnapshot,
    pub post_processing: PostProcessingSnapshot,
}

/// Snapshots of every document in a run, keyed by file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub total_files: usize,
    pub timestamp: DateTime<Utc>,
    pub documents: BTreeMap<String, DocumentSnapshots>,
}

impl Session {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            timestamp: Utc::now(),
            documents: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, snapshots: DocumentSnapshots) {
        self.documents
            .insert(snapshots.pre_processing.file_name.clone(), snapshots);
    }
}
