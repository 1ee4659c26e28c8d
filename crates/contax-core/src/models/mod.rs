//! Data models for contact extraction.

pub mod config;
pub mod record;
pub mod snapshot;

pub use config::{
    AssemblyStrategy, BatchConfig, ContaxConfig, DuplicateConfig, ExtractionConfig, OutputConfig,
    ProcessorConfig, ValidationConfig,
};
pub use record::{Anchor, CleanRecord, DuplicateRecord, Entity, EntityKind, Field, RawRecord};
pub use snapshot::{
    DocumentMetadata, DocumentSnapshots, FieldCounts, PostProcessingSnapshot, PreProcessingRecord,
    PreProcessingSnapshot, ProcessingSummary, Session,
};
