//! PDF inspection.
//!
//! Contact documents are scanned images; the PDF itself is only checked
//! for readability and page count before its saved extraction response is
//! used. Embedded text, when present, backs up a response without text.

mod inspector;

pub use inspector::{PdfInfo, PdfInspector};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

#[cfg(test)]
pub(crate) use inspector::tests::sample_pdf;
