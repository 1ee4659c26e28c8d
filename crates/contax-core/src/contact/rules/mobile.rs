//! Australian mobile number canonicalization.

use super::patterns::NON_DIGIT;

/// Required prefix of a canonical mobile number.
pub const MOBILE_PREFIX: &str = "04";

/// Digit count of a canonical mobile number.
pub const MOBILE_DIGITS: usize = 10;

/// Strip everything but ASCII digits.
pub fn mobile_digits(raw: &str) -> String {
    NON_DIGIT.replace_all(raw, "").into_owned()
}

/// Canonical digits-only form, or `None` when the number is not a mobile.
pub fn canonical_mobile(raw: &str) -> Option<String> {
    let digits = mobile_digits(raw);
    (digits.len() == MOBILE_DIGITS && digits.starts_with(MOBILE_PREFIX)).then_some(digits)
}

pub fn is_valid_mobile(raw: &str) -> bool {
    canonical_mobile(raw).is_some()
}
