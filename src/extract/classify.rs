use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::error::EngineError;
use crate::table::Table;

/// Column names that mark a date-bearing column outright, scanned in this
/// order. 출장기간/기간/휴가기간 are the travel- and leave-log span columns,
/// 날짜 the plain date column.
const PRIORITY_KEYWORDS: &[&str] = &["출장기간", "기간", "휴가기간", "날짜"];

/// Broader date vocabulary for the second pass.
const GENERIC_KEYWORDS: &[&str] = &["날짜", "date", "일시", "기간"];

/// Columns whose name contains one of these hold `start ~ end` spans rather
/// than single dates, and get the range-first parse treatment.
const RANGE_KEYWORDS: &[&str] = &["출장기간", "기간", "휴가기간"];

/// Date pattern for content sniffing. No word-boundary anchors: sniffed
/// values are often glued to other text.
static SNIFF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[./-](\d{1,2})[./-](\d{1,2})").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Name matched one of the priority keywords.
    Priority,
    /// Name matched the broader date vocabulary.
    Keyword,
    /// Qualified by sampled cell content alone.
    Sniffed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateColumnCandidate {
    pub name: String,
    pub confidence: Confidence,
}

/// Rank the columns of `table` that plausibly carry date information.
///
/// Three passes run in order and the first pass that yields anything wins:
/// priority keywords, generic keywords, then content sniffing over sampled
/// values. An empty result means the operator has to pick manually.
pub fn classify_columns(table: &Table) -> Vec<DateColumnCandidate> {
    let passes: &[fn(&Table) -> Vec<DateColumnCandidate>] =
        &[priority_pass, keyword_pass, sniff_pass];

    for pass in passes {
        let found = pass(table);
        if !found.is_empty() {
            debug!(table = %table.name, candidates = ?found, "classification settled");
            return found;
        }
    }
    Vec::new()
}

fn priority_pass(table: &Table) -> Vec<DateColumnCandidate> {
    let mut found: Vec<DateColumnCandidate> = Vec::new();
    for keyword in PRIORITY_KEYWORDS {
        for col in &table.columns {
            let lower = col.to_lowercase();
            if lower == *keyword || lower.contains(*keyword) {
                if found.iter().any(|c| &c.name == col) {
                    continue;
                }
                info!(column = %col, keyword = %keyword, "priority date column");
                found.push(DateColumnCandidate {
                    name: col.clone(),
                    confidence: Confidence::Priority,
                });
            }
        }
    }
    found
}

fn keyword_pass(table: &Table) -> Vec<DateColumnCandidate> {
    table
        .columns
        .iter()
        .filter(|col| {
            let lower = col.to_lowercase();
            GENERIC_KEYWORDS.iter().any(|kw| lower.contains(*kw))
        })
        .map(|col| {
            info!(column = %col, "keyword date column");
            DateColumnCandidate {
                name: col.clone(),
                confidence: Confidence::Keyword,
            }
        })
        .collect()
}

fn sniff_pass(table: &Table) -> Vec<DateColumnCandidate> {
    table
        .columns
        .iter()
        .filter(|col| sniff_primary(table, col) || sniff_secondary(table, col))
        .map(|col| {
            info!(column = %col, "sniffed date column");
            DateColumnCandidate {
                name: col.clone(),
                confidence: Confidence::Sniffed,
            }
        })
        .collect()
}

/// A sampled value with a span marker and a full date pattern qualifies the
/// column outright.
fn sniff_primary(table: &Table, column: &str) -> bool {
    table
        .sample_values(column, 10)
        .iter()
        .any(|val| val.contains('~') && SNIFF_PATTERN.is_match(val))
}

/// Travel/leave exports sometimes carry bare row numbers as headers; skip
/// those, then accept `~`-joined values long enough to be a real span.
fn sniff_secondary(table: &Table, column: &str) -> bool {
    if let Ok(n) = column.parse::<u32>() {
        if n < 20 {
            return false;
        }
    }
    table
        .sample_values(column, 5)
        .iter()
        .any(|val| {
            val.contains('~') && val.chars().count() > 10 && SNIFF_PATTERN.is_match(val)
        })
}

/// True for columns whose values encode a `start ~ end` span.
pub fn is_range_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    RANGE_KEYWORDS.iter().any(|kw| lower.contains(*kw))
}

/// Default subset when several candidates survive: the span-style columns,
/// or failing that the first candidate.
pub fn default_selection(candidates: &[DateColumnCandidate]) -> Vec<String> {
    let spans: Vec<String> = candidates
        .iter()
        .filter(|c| {
            let lower = c.name.to_lowercase();
            lower.contains("출장기간") || lower.contains("기간")
        })
        .map(|c| c.name.clone())
        .collect();

    if !spans.is_empty() {
        return spans;
    }
    candidates.iter().take(1).map(|c| c.name.clone()).collect()
}

/// Final column choice for a table: an explicit selection from config wins,
/// otherwise classification plus the default-subset rule. Zero columns is
/// fatal for the batch.
pub fn resolve_columns(
    table: &Table,
    manual: Option<&[String]>,
) -> Result<Vec<String>, EngineError> {
    if let Some(manual) = manual {
        let present: Vec<String> = manual
            .iter()
            .filter(|name| table.column_index(name).is_some())
            .cloned()
            .collect();
        if present.is_empty() {
            return Err(EngineError::EmptyColumnSelection(manual.to_vec()));
        }
        return Ok(present);
    }

    let candidates = classify_columns(table);
    if candidates.is_empty() {
        return Err(EngineError::NoDateColumn);
    }
    if candidates.len() == 1 {
        return Ok(vec![candidates[0].name.clone()]);
    }
    Ok(default_selection(&candidates))
}
