//! Person name cleaning for OCR output.

use super::patterns::{NAME_DIGITS, NAME_DISALLOWED, WHITESPACE_RUN};

/// Glyphs the OCR service emits for unreadable or elided text.
const NOISE_GLYPHS: [&str; 4] = ["\u{FFFD}", "\u{FF65}\u{FF65}\u{FF65}", "\u{2026}", "\u{2022}"];

/// Clean a name fragment.
///
/// Drops OCR noise, digits and question marks, then any character that is
/// not a letter, hyphen, apostrophe or whitespace. Whitespace is collapsed
/// and each token is title-cased. Never fails; returns an empty string when
/// nothing usable remains.
pub fn clean_name(raw: &str) -> String {
    let mut s = raw.trim().to_string();
    for glyph in NOISE_GLYPHS {
        s = s.replace(glyph, "");
    }

    let s = NAME_DIGITS.replace_all(&s, "");
    let s = NAME_DISALLOWED.replace_all(&s, "");
    let s = WHITESPACE_RUN.replace_all(&s, " ");

    s.trim()
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first letter and lower-case the rest.
fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    // Multi-char upper-case expansions (e.g. ß -> SS) keep only their head upper.
    let mut upper = first.to_uppercase();
    let mut out = String::with_capacity(token.len());
    if let Some(head) = upper.next() {
        out.push(head);
    }
    out.extend(upper.flat_map(char::to_lowercase));
    out.extend(chars.flat_map(char::to_lowercase));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name_basic() {
        assert_eq!(clean_name("  jane   SMITH "), "Jane Smith");
        assert_eq!(clean_name("o'brien-jones"), "O'brien-jones");
    }

    #[test]
    fn test_clean_name_strips_ocr_noise() {
        assert_eq!(clean_name("Jane\u{2026}"), "Jane");
        assert_eq!(clean_name("\u{2022} Smith\u{FFFD}"), "Smith");
        assert_eq!(clean_name("Smith\u{FF65}\u{FF65}\u{FF65}"), "Smith");
        assert_eq!(clean_name("J0hn?"), "Jhn");
        assert_eq!(clean_name("Smith00"), "Smith");
        assert_eq!(clean_name("Anne, (Marie)."), "Anne Marie");
    }

    #[test]
    fn test_clean_name_keeps_accents() {
        assert_eq!(clean_name("josé ÉLODIE"), "José Élodie");
        assert_eq!(clean_name("zoë"), "Zoë");
    }

    #[test]
    fn test_clean_name_empty_results() {
        assert_eq!(clean_name(""), "");
        assert_eq!(clean_name("1234 ??"), "");
        assert_eq!(clean_name("\u{2026}"), "");
    }

    #[test]
    fn test_clean_name_idempotent() {
        let samples = [
            "  jane   SMITH ",
            "o'brien-jones",
            "\u{2022} ßtraße 12",
            "ÿves",
            "J0hn? ?? Mc-DONALD",
            "\tmary\nanne ",
            "",
        ];

        for sample in samples {
            let once = clean_name(sample);
            assert_eq!(clean_name(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
