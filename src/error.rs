use thiserror::Error;

/// Conditions that halt a school's batch until the operator picks columns.
///
/// Per-cell parse failures are not errors; they are aggregated by the row
/// extractor and reported in bulk.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no date-bearing column found; set `date_columns` in the config to choose manually")]
    NoDateColumn,

    #[error("none of the configured date columns {0:?} exist in the uploaded data")]
    EmptyColumnSelection(Vec<String>),
}
