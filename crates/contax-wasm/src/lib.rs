//! WASM bindings for contact record cleaning and validation.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Entity extraction happens elsewhere; these bindings take its output.

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use contax_core::contact::rules;
use contax_core::contact::{find_duplicates as find_duplicate_records, ContactPipeline};
use contax_core::extract::parse_response;
use contax_core::models::config::DuplicateConfig;
use contax_core::models::record::EntityKind;
use contax_core::{CleanRecord, ContaxConfig, ExtractedDocument, Field, ProviderEntity};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Plain objects instead of `Map`s, so rejection counts read naturally in JS.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Build contact records from extracted entities.
///
/// `entities` is an array of `{type, mentionText}` objects. Returns the
/// post-processing snapshot: raw and filtered records, summary and field counts.
#[wasm_bindgen]
pub fn process_entities(file_name: &str, entities: JsValue) -> Result<JsValue, JsValue> {
    ContactProcessor::default().process(file_name, entities)
}

/// Build contact records from a raw extraction service response (JSON text).
#[wasm_bindgen]
pub fn process_response(file_name: &str, response: &str) -> Result<JsValue, JsValue> {
    ContactProcessor::default().process_response(file_name, response)
}

/// Clean an OCR'd name.
#[wasm_bindgen]
pub fn clean_name(name: &str) -> String {
    rules::clean_name(name)
}

/// Normalize a date to `YYYY-MM-DD`, or an empty string.
#[wasm_bindgen]
pub fn normalize_date(date: &str) -> String {
    rules::normalize_date(date)
}

/// Flatten an address and move a misplaced state/postcode block to the end.
#[wasm_bindgen]
pub fn normalize_address(address: &str) -> String {
    rules::normalize_address(address)
}

/// Check whether a string is a valid mobile number after stripping noise.
#[wasm_bindgen]
pub fn is_valid_mobile(mobile: &str) -> bool {
    rules::is_valid_mobile(mobile)
}

/// Digits-only form of a valid mobile number.
#[wasm_bindgen]
pub fn canonical_mobile(mobile: &str) -> Option<String> {
    rules::canonical_mobile(mobile)
}

/// Entity type tags that feed record fields.
#[wasm_bindgen]
pub fn entity_types() -> js_sys::Array {
    EntityKind::ALL
        .iter()
        .map(|kind| JsValue::from_str(kind.tag()))
        .collect()
}

/// Report clean records that share a value in the `key` column.
#[wasm_bindgen]
pub fn find_duplicates(records: JsValue, key: &str, skip_empty: bool) -> Result<JsValue, JsValue> {
    let key: Field = key.parse().map_err(js_error)?;
    let records: Vec<CleanRecord> = serde_wasm_bindgen::from_value(records)?;
    to_js(&find_duplicate_records(&records, key, skip_empty))
}

/// Contact processor configured from a JSON configuration.
#[wasm_bindgen]
pub struct ContactProcessor {
    pipeline: ContactPipeline,
    duplicates: DuplicateConfig,
}

#[wasm_bindgen]
impl ContactProcessor {
    /// Create a processor. `config` is an optional JSON configuration
    /// document; missing sections take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<ContactProcessor, JsValue> {
        let config = match config {
            Some(json) => {
                let config: ContaxConfig = serde_json::from_str(&json).map_err(js_error)?;
                config.validate().map_err(js_error)?;
                config
            }
            None => ContaxConfig::default(),
        };

        Ok(Self {
            pipeline: ContactPipeline::new(&config),
            duplicates: config.duplicates,
        })
    }

    /// Build contact records from an array of entities.
    #[wasm_bindgen]
    pub fn process(&self, file_name: &str, entities: JsValue) -> Result<JsValue, JsValue> {
        let entities: Vec<ProviderEntity> = serde_wasm_bindgen::from_value(entities)?;
        let result = self.pipeline.process_entities(file_name, &entities);
        to_js(&result.post_processing_snapshot())
    }

    /// Build contact records from a raw extraction service response.
    #[wasm_bindgen]
    pub fn process_response(&self, file_name: &str, response: &str) -> Result<JsValue, JsValue> {
        let document: ExtractedDocument = parse_response(response).map_err(js_error)?;
        let result = self.pipeline.process_extracted(file_name, document);
        to_js(&result.snapshots())
    }

    /// Duplicate report over clean records using the configured key.
    #[wasm_bindgen]
    pub fn duplicates(&self, records: JsValue) -> Result<JsValue, JsValue> {
        let records: Vec<CleanRecord> = serde_wasm_bindgen::from_value(records)?;
        to_js(&find_duplicate_records(
            &records,
            self.duplicates.key_field,
            self.duplicates.skip_empty_keys,
        ))
    }
}

impl Default for ContactProcessor {
    fn default() -> Self {
        Self {
            pipeline: ContactPipeline::default(),
            duplicates: DuplicateConfig::default(),
        }
    }
}
