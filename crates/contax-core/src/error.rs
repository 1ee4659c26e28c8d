//! Error types for the contax-core library.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for the contax library.
#[derive(Error, Debug)]
pub enum ContaxError {
    /// Document extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// PDF inspection error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A streaming sink refused a document result.
    #[error("sink error: {0}")]
    Sink(String),
}

/// Errors raised while obtaining entities for a document.
///
/// "No entities found" is not represented here: an empty entity list is a
/// valid extraction outcome.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document could not be read or is not a usable PDF.
    #[error("unreadable document {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    /// No saved service response exists for the document.
    #[error("no extraction response found at {0}")]
    MissingResponse(PathBuf),

    /// The service response could not be decoded.
    #[error("invalid extraction response: {0}")]
    InvalidResponse(String),

    /// The service rejected the credentials.
    #[error("credentials rejected: {0}")]
    Credentials(String),

    /// The service quota is exhausted.
    #[error("quota exhausted: {0}")]
    Quota(String),

    /// A failure that may succeed on retry.
    #[error("transient failure: {0}")]
    Transient(String),

    /// The extraction call did not finish in time.
    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),

    /// The worker running the extraction panicked.
    #[error("extraction worker failed: {0}")]
    Worker(String),
}

impl ExtractionError {
    /// Whether retrying the call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ExtractionError::Transient(_))
    }

    /// Short machine-readable name used in failure reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::Unreadable { .. } => "unreadable",
            ExtractionError::MissingResponse(_) => "missing_response",
            ExtractionError::InvalidResponse(_) => "invalid_response",
            ExtractionError::Credentials(_) => "credentials",
            ExtractionError::Quota(_) => "quota",
            ExtractionError::Transient(_) => "transient",
            ExtractionError::Timeout(_) => "timeout",
            ExtractionError::Worker(_) => "worker",
        }
    }
}

/// Errors related to PDF inspection.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Result type for the contax library.
pub type Result<T> = std::result::Result<T, ContaxError>;
