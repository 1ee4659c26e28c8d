//! Extraction boundary: obtaining typed entities for a document.
//!
//! The entity-extraction service itself is external. This module defines
//! what the pipeline needs from it, decodes its responses, and normalizes
//! the entities it returns.

mod normalizer;
pub mod provider;
#[cfg(feature = "native")]
mod response;

pub use normalizer::normalize_entities;
pub use provider::{parse_response, ProviderEntity, ServiceStatus};
#[cfg(feature = "native")]
pub use response::ResponseFileExtractor;

use std::path::Path;

use crate::error::ExtractionError;

/// Result type for extraction calls.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// What the extraction service returned for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDocument {
    /// Entities in provider order. May be empty.
    pub entities: Vec<ProviderEntity>,

    /// Full recognized text, when available.
    pub text: Option<String>,

    /// Page count, when known.
    pub page_count: Option<u32>,
}

/// Source of entities for a document.
///
/// Implementations must be shareable across worker threads; the batch
/// orchestrator calls `extract` from a blocking pool.
pub trait DocumentExtractor: Send + Sync {
    /// Extract entities from the document at `path`.
    fn extract(&self, path: &Path) -> Result<ExtractedDocument>;
}

impl<F> DocumentExtractor for F
where
    F: Fn(&Path) -> Result<ExtractedDocument> + Send + Sync,
{
    fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        self(path)
    }
}
