pub mod classify;
pub mod date;
pub mod rows;

pub use classify::{
    classify_columns, default_selection, is_range_column, resolve_columns, Confidence,
    DateColumnCandidate,
};
pub use date::{extract_date, parse_cell};
pub use rows::{extract_rows, ExtractionOutcome, ExtractionResult};
