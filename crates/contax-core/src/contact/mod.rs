//! Contact record assembly, cleaning and validation.

pub mod assembler;
pub mod duplicates;
mod pipeline;
pub mod rules;
pub mod validator;

pub use assembler::{assemble, assemble_by_layout, assemble_positional};
pub use duplicates::{find_duplicates, report_duplicates};
pub use pipeline::{display_name, ContactPipeline, DocumentResult};
pub use validator::{dedupe_by_mobile, Rejection, ValidationStats, Validator};
