use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::table::RawCell;

/// 4-digit year, then month and day with a matching `.`/`-`/`/` separator,
/// anywhere in a string.
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})[./-](\d{1,2})[./-](\d{1,2})\b").unwrap());

/// Travel/leave-record span with a time on the left side,
/// e.g. `2025-4-23 9:00 ~ 2025-4-24`.
static LEAVE_SPAN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2}) \d{1,2}:\d{1,2} ~ \d{4}-\d{1,2}-\d{1,2}").unwrap()
});

/// Formats the best-effort pass tries, mirroring what the contributed
/// spreadsheets actually contain.
const WHOLE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y.%m.%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%Y년 %m월 %d일",
];
const WHOLE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
];

/// Turn one raw cell into a calendar date, or `None` when the cell holds no
/// recognizable date. `None` is "no value", never a batch error.
pub fn parse_cell(raw: &RawCell, is_range_column: bool) -> Option<NaiveDate> {
    match raw {
        RawCell::Empty => None,
        RawCell::Date(d) => Some(*d),
        // Bare numbers carry no calendar information we can trust.
        RawCell::Number(_) => None,
        RawCell::Text(s) => extract_date(s, is_range_column),
    }
}

/// The string cascade. Rules run in a fixed order and the first success
/// wins; every failure falls through to the next rule.
pub fn extract_date(raw: &str, is_range_column: bool) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    debug!(value = %text, "date extraction attempt");

    // Columns known by name to hold spans get the date-before-separator
    // treatment first, with a bare `~` accepted in place of ` ~ `.
    // A failed attempt here still falls through to the generic cascade.
    if is_range_column {
        if let Some(date) = span_leading_date(text, "~") {
            debug!(value = %text, %date, "range column leading date");
            return Some(date);
        }
    }

    // 1. "YYYY.MM.DD HH:MM ~ YYYY.MM.DD HH:MM" and friends
    if text.contains(" ~ ") {
        if let Some(date) = span_leading_date(text, " ~ ") {
            debug!(value = %text, %date, "span leading date");
            return Some(date);
        }
    }

    // 2. plain YYYY.MM.DD
    if text.matches('.').count() == 2 {
        if let Some(date) = three_part_date(text, '.', true) {
            return Some(date);
        }
    }

    // 3. plain YYYY-MM-DD
    if text.matches('-').count() == 2 {
        if let Some(date) = three_part_date(text, '-', true) {
            return Some(date);
        }
    }

    // 4. first embedded date pattern anywhere in the string
    if let Some(caps) = DATE_PATTERN.captures(text) {
        if let Some(date) = captures_to_date(&caps) {
            debug!(value = %text, %date, "embedded date pattern");
            return Some(date);
        }
    }

    // 5. best-effort parse of the whole string
    if let Some(date) = best_effort(text) {
        debug!(value = %text, %date, "best-effort parse");
        return Some(date);
    }

    // 6. leave-record span with a time, date taken from the left side
    if LEAVE_SPAN_PATTERN.is_match(text) {
        let token = text.split(' ').next().unwrap_or(text);
        if let Some(date) = three_part_date(token, '-', false) {
            debug!(value = %text, %date, "leave span leading date");
            return Some(date);
        }
    }

    warn!(value = %text, "date extraction failed");
    None
}

/// Take the part before `sep`, strip any time-of-day after a space, and
/// parse the remaining token as a dot- or hyphen-separated date.
fn span_leading_date(text: &str, sep: &str) -> Option<NaiveDate> {
    let first_part = text.split(sep).next()?.trim();
    let token = first_part.split(' ').next().unwrap_or(first_part).trim();

    if token.contains('.') {
        three_part_date(token, '.', false)
    } else if token.contains('-') {
        three_part_date(token, '-', false)
    } else {
        None
    }
}

/// Split `token` on `sep` into exactly year/month/day and construct a
/// validated date. `require_4digit_year` guards the whole-string rules so
/// that e.g. phone-number fragments never pass as dates.
fn three_part_date(token: &str, sep: char, require_4digit_year: bool) -> Option<NaiveDate> {
    let parts: Vec<&str> = token.split(sep).collect();
    if parts.len() != 3 {
        return None;
    }
    if require_4digit_year && parts[0].len() != 4 {
        return None;
    }
    let year: i32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let day: u32 = parts[2].trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn captures_to_date(caps: &regex::Captures<'_>) -> Option<NaiveDate> {
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn best_effort(text: &str) -> Option<NaiveDate> {
    for fmt in WHOLE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }
    for fmt in WHOLE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    None
}
