//! Extraction from saved service responses.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::{parse_response, DocumentExtractor, ExtractedDocument, Result};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::pdf::PdfInspector;

/// Reads entities from JSON responses saved from the extraction service.
///
/// A `.json` path is decoded directly. For any other path the document is
/// inspected as a PDF and `<stem>.json` is looked up in the responses
/// directory, or next to the document when none is configured.
#[derive(Debug, Clone, Default)]
pub struct ResponseFileExtractor {
    responses_dir: Option<PathBuf>,
}

impl ResponseFileExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.responses_dir = Some(dir.into());
        self
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            responses_dir: config.responses_dir.clone(),
        }
    }

    /// Where the saved response for `document` is expected.
    pub fn response_path(&self, document: &Path) -> PathBuf {
        let file_name = document
            .file_stem()
            .map(|stem| {
                let mut name = stem.to_os_string();
                name.push(".json");
                name
            })
            .unwrap_or_else(|| "response.json".into());

        match &self.responses_dir {
            Some(dir) => dir.join(file_name),
            None => document.with_file_name(file_name),
        }
    }
}

impl DocumentExtractor for ResponseFileExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        if is_json(path) {
            return read_response(path);
        }

        let data = fs::read(path).map_err(|e| io_failure(path, e))?;
        let info = PdfInspector::inspect(&data).map_err(|e| ExtractionError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!("{}: {} pages", path.display(), info.page_count);

        let response_path = self.response_path(path);
        let mut document = read_response(&response_path)?;

        if document.page_count.is_none() {
            document.page_count = Some(info.page_count);
        }
        if document.text.is_none() {
            trace!("Response has no text, using embedded PDF text");
            document.text = info.text;
        }

        Ok(document)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_response(path: &Path) -> Result<ExtractedDocument> {
    let json = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ExtractionError::MissingResponse(path.to_path_buf()),
        _ => io_failure(path, e),
    })?;
    trace!("Read {} bytes from {}", json.len(), path.display());
    parse_response(&json)
}

fn io_failure(path: &Path, err: io::Error) -> ExtractionError {
    match err.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
            ExtractionError::Transient(format!("{}: {}", path.display(), err))
        }
        _ => ExtractionError::Unreadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
    }
}
