//! OCR-tolerant date normalization.
//!
//! Dates arrive as free text from the extraction service ("26Jul--1971",
//! "17-Jun-1970", "07.08.2019") and are read day-first.

use chrono::NaiveDate;

use super::patterns::{DASH_RUN, DATE_DISALLOWED, DATE_GLUED, DATE_TOKEN};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Normalize a date to `YYYY-MM-DD`, or an empty string when unparseable.
pub fn normalize_date(raw: &str) -> String {
    parse_date(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Parse an OCR date string day-first.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = clean_date_text(raw);
    if cleaned.is_empty() {
        return None;
    }
    parse_day_first(&cleaned)
}

/// Scrub OCR artifacts from a date string without interpreting it.
pub fn clean_date_text(raw: &str) -> String {
    let s = DASH_RUN.replace_all(raw.trim(), "-").replace('.', "-");
    let s = DATE_DISALLOWED.replace_all(&s, "");
    let s = DASH_RUN.replace_all(&s, "-");
    let s = s.trim_matches(|c: char| c == '-' || c.is_whitespace());

    match DATE_GLUED.captures(s) {
        Some(caps) => format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]),
        None => s.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Token<'a> {
    Number(&'a str),
    Month(u32),
}

fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let mut tokens = Vec::new();
    for m in DATE_TOKEN.find_iter(s) {
        let text = m.as_str();
        if text.starts_with(|c: char| c.is_ascii_digit()) {
            tokens.push(Token::Number(text));
        } else if let Some(month) = month_from_name(text) {
            tokens.push(Token::Month(month));
        } else if !is_filler(text) {
            return None;
        }
    }

    match tokens.as_slice() {
        [Token::Number(compact)] if compact.len() == 8 => ymd(
            &compact[0..4],
            compact[4..6].parse().ok()?,
            &compact[6..8],
        ),
        [Token::Number(a), Token::Month(m), Token::Number(b)] => {
            if a.len() == 4 {
                ymd(a, *m, b)
            } else {
                ymd(b, *m, a)
            }
        }
        [Token::Month(m), Token::Number(d), Token::Number(y)] => ymd(y, *m, d),
        // Month and year only fall on the first of the month.
        [Token::Month(m), Token::Number(y)] | [Token::Number(y), Token::Month(m)]
            if y.len() == 4 =>
        {
            ymd(y, *m, "1")
        }
        [Token::Number(a), Token::Number(b), Token::Number(c)] => {
            if a.len() == 4 {
                return ymd(a, b.parse().ok()?, c);
            }
            // Day-first, then month-first when the day-first reading is impossible.
            ymd(c, b.parse().ok()?, a).or_else(|| ymd(c, a.parse().ok()?, b))
        }
        _ => None,
    }
}

fn ymd(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    let year = parse_year(year)?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        4 => Some(year),
        // Two-digit year: 00-50 are 2000s, 51-99 are 1900s
        2 if year <= 50 => Some(2000 + year),
        2 => Some(1900 + year),
        _ => None,
    }
}

/// Weekday names and ordinal suffixes ("26th") carry no date part.
fn is_filler(word: &str) -> bool {
    let word = word.to_lowercase();
    if matches!(word.as_str(), "st" | "nd" | "rd" | "th") {
        return true;
    }
    word.len() >= 3 && WEEKDAYS.iter().any(|day| day.starts_with(&word))
}

fn month_from_name(name: &str) -> Option<u32> {
    if name.len() < 3 {
        return None;
    }
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|full| full.starts_with(&name))
        .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_input_unchanged() {
        assert_eq!(normalize_date("1970-06-17"), "1970-06-17");
        assert_eq!(normalize_date("2024-02-29"), "2024-02-29");
    }

    #[test]
    fn test_month_name_formats() {
        assert_eq!(normalize_date("17-Jun-1970"), "1970-06-17");
        assert_eq!(normalize_date("26Jul--1971"), "1971-07-26");
        assert_eq!(normalize_date("15Aug\u{2013}\u{2013}2022"), "2022-08-15");
        assert_eq!(normalize_date("07Aug-2019-"), "2019-08-07");
        assert_eq!(normalize_date("25Jul1962"), "1962-07-25");
        assert_eq!(normalize_date("3 September 1985"), "1985-09-03");
        assert_eq!(normalize_date("Sept 3 1985"), "1985-09-03");
        assert_eq!(normalize_date("Tue 26th Jul 1971"), "1971-07-26");
        assert_eq!(normalize_date("17\u{2013}06\u{2013}1970"), "1970-06-17");
    }

    #[test]
    fn test_numeric_day_first() {
        assert_eq!(normalize_date("05/04/2001"), "2001-04-05");
        assert_eq!(normalize_date("05.04.2001"), "2001-04-05");
        assert_eq!(normalize_date("5-4-01"), "2001-04-05");
        assert_eq!(normalize_date("05/04/71"), "1971-04-05");
        assert_eq!(normalize_date("19710726"), "1971-07-26");
    }

    #[test]
    fn test_month_and_year_only() {
        assert_eq!(normalize_date("Jul 1971"), "1971-07-01");
        assert_eq!(normalize_date("July-1971"), "1971-07-01");
        assert_eq!(normalize_date("1971 Jul"), "1971-07-01");
        assert_eq!(normalize_date("Tue 26th Jul"), "");
    }

    #[test]
    fn test_month_first_fallback() {
        assert_eq!(normalize_date("04/25/2001"), "2001-04-25");
    }

    #[test]
    fn test_unparseable_is_empty() {
        assert_eq!(normalize_date("????"), "");
        assert_eq!(normalize_date(""), "");
        assert_eq!(normalize_date("not a date"), "");
        assert_eq!(normalize_date("31-Feb-2001"), "");
        assert_eq!(normalize_date("45/45/2001"), "");
        assert_eq!(normalize_date("Jul 71"), "");
    }

    #[test]
    fn test_clean_date_text() {
        assert_eq!(clean_date_text("25Jul1962"), "25-Jul-1962");
        assert_eq!(clean_date_text(" --26Jul\u{2014}1971-- "), "26Jul-1971");
        assert_eq!(clean_date_text("07.08.2019"), "07-08-2019");
        assert_eq!(clean_date_text("12*/03/1999!"), "12/03/1999");
    }
}
