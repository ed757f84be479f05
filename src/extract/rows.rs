use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use super::date::parse_cell;
use crate::table::Table;

/// How many failing original values to keep for operator diagnosis.
const FAILURE_EXAMPLE_LIMIT: usize = 5;

/// Per-row outcome. `date` is set iff `source_column` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// Raw value of the first selected column, kept for diagnosis.
    pub original: String,
    pub date: Option<NaiveDate>,
    /// Which column the date came from.
    pub source_column: Option<String>,
}

/// Aggregate of one table's extraction: per-row results plus the failure
/// bookkeeping the operator sees.
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    pub results: Vec<ExtractionResult>,
    pub success_count: usize,
    pub failure_count: usize,
    /// At most [`FAILURE_EXAMPLE_LIMIT`] examples.
    pub failure_examples: Vec<String>,
    /// Successful extractions per source column.
    pub column_hits: BTreeMap<String, usize>,
}

impl ExtractionOutcome {
    /// Deduplicated dates from the successful rows. Unparsed rows are
    /// dropped here; reprocessing the same table never doubles its
    /// contribution.
    pub fn occupied_dates(&self) -> BTreeSet<NaiveDate> {
        self.results.iter().filter_map(|r| r.date).collect()
    }
}

/// Try `date_columns` in order for every row; the first column whose cell is
/// non-empty and parses wins the row. Failures are counted, never fatal.
pub fn extract_rows<F>(table: &Table, date_columns: &[String], is_range: F) -> ExtractionOutcome
where
    F: Fn(&str) -> bool,
{
    let mut outcome = ExtractionOutcome::default();

    for row_idx in 0..table.rows.len() {
        let original = date_columns
            .first()
            .and_then(|col| table.cell(row_idx, col))
            .map(|cell| cell.render())
            .unwrap_or_default();

        let mut extracted: Option<(NaiveDate, String)> = None;
        for col in date_columns {
            let Some(cell) = table.cell(row_idx, col) else {
                continue;
            };
            if cell.is_empty() {
                continue;
            }
            if let Some(date) = parse_cell(cell, is_range(col)) {
                debug!(row = row_idx, column = %col, %date, "row extracted");
                extracted = Some((date, col.clone()));
                break;
            }
            debug!(row = row_idx, column = %col, "row cell did not parse");
        }

        match extracted {
            Some((date, col)) => {
                outcome.success_count += 1;
                *outcome.column_hits.entry(col.clone()).or_insert(0) += 1;
                outcome.results.push(ExtractionResult {
                    original,
                    date: Some(date),
                    source_column: Some(col),
                });
            }
            None => {
                outcome.failure_count += 1;
                if outcome.failure_examples.len() < FAILURE_EXAMPLE_LIMIT {
                    outcome.failure_examples.push(original.clone());
                }
                outcome.results.push(ExtractionResult {
                    original,
                    date: None,
                    source_column: None,
                });
            }
        }
    }

    info!(
        table = %table.name,
        success = outcome.success_count,
        failed = outcome.failure_count,
        "extraction finished"
    );
    outcome
}
