//! Common regex patterns for contact field cleaning.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // Names
    pub static ref NAME_DIGITS: Regex = Regex::new(r"[\d?]+").unwrap();

    pub static ref NAME_DISALLOWED: Regex = Regex::new(
        r"[^A-Za-z\x{00C0}-\x{00D6}\x{00D8}-\x{00F6}\x{00F8}-\x{00FF}\x{0178}'\-\s]"
    ).unwrap();

    // Dates
    pub static ref DASH_RUN: Regex = Regex::new(r"[-\x{2013}\x{2014}]+").unwrap();

    pub static ref DATE_DISALLOWED: Regex = Regex::new(r"[^0-9A-Za-z \-/]").unwrap();

    // OCR glue such as "25Jul1962"
    pub static ref DATE_GLUED: Regex = Regex::new(r"^([0-9]{1,2})([A-Za-z]{3,})([0-9]{4})$").unwrap();

    pub static ref DATE_TOKEN: Regex = Regex::new(r"[0-9]+|[A-Za-z]+").unwrap();

    // Addresses
    pub static ref ADDRESS_SEPARATORS: Regex = Regex::new(r"[,;|/]").unwrap();

    // NSW 2289 114 Northcott Drive
    pub static ref STATE_POSTCODE_LEADING: Regex = Regex::new(
        r"^([A-Z]{2,3})\s+([0-9]{4})\s+(.+)$"
    ).unwrap();

    // 2289 114 Northcott Drive NSW
    pub static ref POSTCODE_LEADING_STATE_TRAILING: Regex = Regex::new(
        r"^([0-9]{4})\s+(.+?)\s+([A-Z]{2,3})$"
    ).unwrap();

    // 114 Northcott Drive NSW 2289 ADAMSTOWN HEIGHTS
    pub static ref STATE_POSTCODE_EMBEDDED: Regex = Regex::new(
        r"^(.+?)\s+([A-Z]{2,3})\s+([0-9]{4})\s+(.+)$"
    ).unwrap();

    pub static ref STATE_POSTCODE_ANYWHERE: Regex = Regex::new(
        r"\b([A-Z]{2,3})\s+([0-9]{4})\b"
    ).unwrap();

    // Phone numbers
    pub static ref NON_DIGIT: Regex = Regex::new(r"[^0-9]").unwrap();
}
