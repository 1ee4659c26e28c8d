//! Address flattening and state/postcode reordering.
//!
//! OCR frequently reads the `STATE POSTCODE` block of an Australian address
//! before the street line. Addresses are flattened to one line and the
//! block is moved to the end.

use super::patterns::{
    ADDRESS_SEPARATORS, POSTCODE_LEADING_STATE_TRAILING, STATE_POSTCODE_ANYWHERE,
    STATE_POSTCODE_EMBEDDED, STATE_POSTCODE_LEADING, WHITESPACE_RUN,
};

/// Flatten and reorder an address.
pub fn normalize_address(raw: &str) -> String {
    fix_address_ordering(&flatten_address(raw))
}

/// Collapse a multi-line address to a single line.
pub fn flatten_address(raw: &str) -> String {
    let s = raw.replace(['\r', '\n'], " ");
    let s = ADDRESS_SEPARATORS.replace_all(&s, " ");
    let s = WHITESPACE_RUN.replace_all(&s, " ");
    s.trim().trim_end_matches('.').trim_end().to_string()
}

/// Move a misplaced `STATE POSTCODE` block to the end of the address.
///
/// Returns the input unchanged when no block is found.
pub fn fix_address_ordering(address: &str) -> String {
    let address = address.trim();
    if address.is_empty() {
        return String::new();
    }

    // NSW 2289 114 Northcott Drive
    if let Some(caps) = STATE_POSTCODE_LEADING.captures(address) {
        return format!("{} {} {}", &caps[3], &caps[1], &caps[2]);
    }

    // 2289 114 Northcott Drive NSW
    if let Some(caps) = POSTCODE_LEADING_STATE_TRAILING.captures(address) {
        return format!("{} {} {}", &caps[2], &caps[3], &caps[1]);
    }

    // 114 Northcott Drive NSW 2289 Adamstown Heights
    if let Some(caps) = STATE_POSTCODE_EMBEDDED.captures(address) {
        return format!("{} {} {} {}", &caps[1], &caps[4], &caps[2], &caps[3]);
    }

    if let Some(caps) = STATE_POSTCODE_ANYWHERE.captures(address) {
        let block = format!("{} {}", &caps[1], &caps[2]);
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        let rest = format!("{} {}", &address[..whole.start], &address[whole.end..]);
        let rest = WHITESPACE_RUN.replace_all(rest.trim(), " ");
        if rest.is_empty() {
            return block;
        }
        return format!("{} {}", rest, block);
    }

    address.to_string()
}

/// Whether a digit appears within the first `window` characters.
///
/// Used to require a leading street number.
pub fn has_leading_number(address: &str, window: usize) -> bool {
    address.chars().take(window).any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_postcode_leading() {
        assert_eq!(
            normalize_address("NSW 2289 114 Northcott Drive Adamstown Heights"),
            "114 Northcott Drive Adamstown Heights NSW 2289"
        );
        assert_eq!(normalize_address("NSW 2289 12 High St"), "12 High St NSW 2289");
    }

    #[test]
    fn test_postcode_leading_state_trailing() {
        assert_eq!(
            normalize_address("2289 114 Northcott Drive NSW"),
            "114 Northcott Drive NSW 2289"
        );
    }

    #[test]
    fn test_state_postcode_embedded() {
        assert_eq!(
            normalize_address("114 Northcott Drive NSW 2289 ADAMSTOWN HEIGHTS"),
            "114 Northcott Drive ADAMSTOWN HEIGHTS NSW 2289"
        );
    }

    #[test]
    fn test_flatten() {
        assert_eq!(
            flatten_address("12 High St,\r\nSpringfield;  VIC 3000."),
            "12 High St Springfield VIC 3000"
        );
        assert_eq!(flatten_address("Unit 4/18 Bay Rd | Sydney"), "Unit 4 18 Bay Rd Sydney");
        assert_eq!(flatten_address("  \n "), "");
    }

    #[test]
    fn test_no_block_unchanged() {
        assert_eq!(normalize_address("12 High Street Springfield"), "12 High Street Springfield");
        // Lower-case state abbreviations are not recognized.
        assert_eq!(normalize_address("nsw 2289 12 High St"), "nsw 2289 12 High St");
    }

    #[test]
    fn test_reorder_idempotent() {
        let samples = [
            "NSW 2289 114 Northcott Drive Adamstown Heights",
            "2289 114 Northcott Drive NSW",
            "114 Northcott Drive NSW 2289 ADAMSTOWN HEIGHTS",
            "12 High St NSW 2289",
            "PO Box 12 Sydney",
        ];

        for sample in samples {
            let once = normalize_address(sample);
            assert_eq!(fix_address_ordering(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_has_leading_number() {
        assert!(has_leading_number("12 High St", 15));
        assert!(!has_leading_number("Lot Seventeen Rd 12", 15));
        assert!(has_leading_number("Lot Seventeen Rd 12", 25));
        assert!(!has_leading_number("", 15));
    }

    #[test]
    fn test_only_ascii_digits_form_a_postcode() {
        // Arabic-Indic and full-width digits
        assert_eq!(
            normalize_address("NSW \u{662}\u{662}\u{668}\u{669} 12 High St"),
            "NSW \u{662}\u{662}\u{668}\u{669} 12 High St"
        );
        assert_eq!(
            normalize_address("12 High St NSW \u{ff12}\u{ff12}\u{ff18}\u{ff19} Adamstown"),
            "12 High St NSW \u{ff12}\u{ff12}\u{ff18}\u{ff19} Adamstown"
        );
        assert!(!has_leading_number("\u{662}\u{662} High St", 15));
    }
}
