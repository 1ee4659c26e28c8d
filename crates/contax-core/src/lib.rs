//! Core library for contact record extraction.
//!
//! This crate provides:
//! - Decoding and normalization of document entity-extraction responses
//! - Record assembly from per-type entity lists (positional or by layout)
//! - OCR-tolerant field cleaning (names, dates, addresses, mobiles)
//! - Record validation, deduplication and duplicate reporting
//! - Batch orchestration with bounded concurrency (native only)

pub mod contact;
pub mod error;
pub mod export;
pub mod extract;
pub mod models;

#[cfg(feature = "native")]
pub mod batch;
#[cfg(feature = "native")]
pub mod pdf;

pub use contact::{
    find_duplicates, ContactPipeline, DocumentResult, Rejection, ValidationStats, Validator,
};
pub use error::{ContaxError, ExtractionError, PdfError, Result};
pub use extract::{DocumentExtractor, ExtractedDocument, ProviderEntity};
pub use models::config::ContaxConfig;
pub use models::record::{CleanRecord, DuplicateRecord, Entity, Field, RawRecord};

#[cfg(feature = "native")]
pub use batch::{BatchMode, BatchOrchestrator, BatchResult, ResultSink};
#[cfg(feature = "native")]
pub use extract::ResponseFileExtractor;
