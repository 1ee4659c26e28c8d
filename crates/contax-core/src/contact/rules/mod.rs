//! Field cleaners for OCR'd contact data.
//!
//! Every cleaner is total: garbage in yields an empty string (or `None`),
//! never an error.

pub mod address;
pub mod dates;
pub mod mobile;
pub mod name;
pub mod patterns;

pub use address::{fix_address_ordering, flatten_address, has_leading_number, normalize_address};
pub use dates::{clean_date_text, normalize_date, parse_date};
pub use mobile::{canonical_mobile, is_valid_mobile, mobile_digits, MOBILE_DIGITS, MOBILE_PREFIX};
pub use name::clean_name;
