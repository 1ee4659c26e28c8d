//! PDF loading and text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::Result;
use crate::error::PdfError;

/// A loaded PDF.
pub struct PdfInspector {
    document: Document,
    raw_data: Vec<u8>,
    was_encrypted: bool,
}

/// What inspection learned about a document.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfInfo {
    pub page_count: u32,
    /// Whether the file was encrypted with an empty user password.
    pub was_encrypted: bool,
    /// Embedded text layer, `None` for image-only scans.
    pub text: Option<String>,
}

impl PdfInspector {
    /// Load a PDF from bytes.
    ///
    /// Documents encrypted with an empty password are decrypted; anything
    /// else encrypted is refused.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let was_encrypted = document.is_encrypted();
        let raw_data = if was_encrypted {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if document.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", document.get_pages().len());
        Ok(Self {
            document,
            raw_data,
            was_encrypted,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Extract the embedded text layer.
    pub fn extract_text(&self) -> Result<String> {
        // pdf-extract panics on some malformed font tables
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&self.raw_data))
            .map_err(|_| PdfError::TextExtraction("text extractor panicked".to_string()))?
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Load and summarize a PDF in one step.
    ///
    /// Text extraction failures are not fatal: scans often carry no text
    /// layer or fonts pdf-extract cannot decode.
    pub fn inspect(data: &[u8]) -> Result<PdfInfo> {
        let inspector = Self::load(data)?;

        let text = match inspector.extract_text() {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                debug!("No usable text layer: {}", e);
                None
            }
        };

        Ok(PdfInfo {
            page_count: inspector.page_count(),
            was_encrypted: inspector.was_encrypted,
            text,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF with one text line per page.
    pub(crate) fn sample_pdf(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_load_counts_pages() {
        let data = sample_pdf(&["Jane Smith", "John Citizen"]);
        let inspector = PdfInspector::load(&data).unwrap();
        assert_eq!(inspector.page_count(), 2);
    }

    #[test]
    fn test_inspect_plain_pdf() {
        let data = sample_pdf(&["Jane Smith"]);
        let info = PdfInspector::inspect(&data).unwrap();
        assert_eq!(info.page_count, 1);
        assert!(!info.was_encrypted);
    }

    #[test]
    fn test_rejects_garbage() {
        let result = PdfInspector::load(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }
}
