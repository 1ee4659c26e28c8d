//! Wire types of the document entity-extraction service.
//!
//! Responses are accepted in both the REST (camelCase) and client-library
//! (snake_case) spellings.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ExtractionError;
use crate::models::record::Anchor;

use super::ExtractedDocument;

/// An entity as the service returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderEntity {
    /// Entity type tag, in whatever case the processor was trained with.
    #[serde(rename = "type", alias = "type_", default)]
    pub entity_type: String,

    /// Matched text; absent when the service found a type but no text.
    #[serde(rename = "mentionText", alias = "mention_text", default)]
    pub mention_text: Option<String>,

    #[serde(
        rename = "pageAnchor",
        alias = "page_anchor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub page_anchor: Option<PageAnchor>,
}

impl ProviderEntity {
    pub fn new(entity_type: impl Into<String>, mention_text: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            mention_text: Some(mention_text.into()),
            page_anchor: None,
        }
    }

    /// Layout position from the first page reference, when it has a bounding box.
    pub fn anchor(&self) -> Option<Anchor> {
        let page_ref = self.page_anchor.as_ref()?.page_refs.first()?;
        let vertices = &page_ref.bounding_poly.as_ref()?.normalized_vertices;
        let top = vertices.iter().map(|v| v.y).reduce(f32::min)?;

        Some(Anchor {
            page: page_ref.page,
            top,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageAnchor {
    #[serde(rename = "pageRefs", alias = "page_refs", default)]
    pub page_refs: Vec<PageRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRef {
    /// Zero-based page index. Sent as a string by the REST API.
    #[serde(default, deserialize_with = "page_number")]
    pub page: u32,

    #[serde(
        rename = "boundingPoly",
        alias = "bounding_poly",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingPoly {
    #[serde(rename = "normalizedVertices", alias = "normalized_vertices", default)]
    pub normalized_vertices: Vec<Vertex>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

fn page_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PageNumber {
        Number(u32),
        Text(String),
    }

    match PageNumber::deserialize(deserializer)? {
        PageNumber::Number(n) => Ok(n),
        PageNumber::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// The processed document body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderDocument {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub entities: Vec<ProviderEntity>,

    #[serde(default)]
    pub pages: Vec<serde_json::Value>,
}

/// Error status embedded in a failed response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub code: i32,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub status: Option<String>,
}

impl ServiceStatus {
    /// Map a service status code onto the extraction error taxonomy.
    pub fn into_error(self) -> ExtractionError {
        let message = match self.status {
            Some(status) => format!("{}: {}", status, self.message),
            None => self.message,
        };

        match self.code {
            // UNAUTHENTICATED, PERMISSION_DENIED
            16 | 7 => ExtractionError::Credentials(message),
            // RESOURCE_EXHAUSTED
            8 => ExtractionError::Quota(message),
            // UNAVAILABLE, DEADLINE_EXCEEDED
            14 | 4 => ExtractionError::Transient(message),
            code => ExtractionError::InvalidResponse(format!("service error {}: {}", code, message)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    document: Option<ProviderDocument>,

    #[serde(default)]
    error: Option<ServiceStatus>,

    #[serde(flatten)]
    inline: ProviderDocument,
}

/// Decode a saved service response.
///
/// Accepts `{text, entities}`, `{document: {text, entities}}`, or an error
/// envelope `{error: {code, message}}`, which is classified.
pub fn parse_response(json: &str) -> Result<ExtractedDocument, ExtractionError> {
    let envelope: ResponseEnvelope =
        serde_json::from_str(json).map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;

    if let Some(status) = envelope.error {
        return Err(status.into_error());
    }

    let document = envelope.document.unwrap_or(envelope.inline);
    let page_count = (!document.pages.is_empty()).then(|| document.pages.len() as u32);

    Ok(ExtractedDocument {
        entities: document.entities,
        text: document.text,
        page_count,
    })
}
