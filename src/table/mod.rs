pub mod load;

pub use load::load_table;

use chrono::NaiveDate;

/// A single cell as materialized from an uploaded spreadsheet.
///
/// The engine never mutates cells; it only derives dates from them.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    /// Already-typed date value. Time-of-day is dropped at load.
    Date(NaiveDate),
    Text(String),
    Number(f64),
    Empty,
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }

    /// Render the cell for diagnostics and provenance reporting.
    pub fn render(&self) -> String {
        match self {
            RawCell::Date(d) => d.format("%Y-%m-%d").to_string(),
            RawCell::Text(s) => s.clone(),
            RawCell::Number(n) => format!("{}", n),
            RawCell::Empty => String::new(),
        }
    }
}

/// One contributor's spreadsheet: insertion-ordered named columns plus rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Source file name, for logs and reports.
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Table {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row_idx` in the column called `column`, if both exist.
    pub fn cell(&self, row_idx: usize, column: &str) -> Option<&RawCell> {
        let col = self.column_index(column)?;
        self.rows.get(row_idx)?.get(col)
    }

    /// Up to `limit` non-empty values of `column`, rendered as text.
    /// Used by the classifier's content-sniffing pass.
    pub fn sample_values(&self, column: &str, limit: usize) -> Vec<String> {
        let Some(col) = self.column_index(column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(col))
            .filter(|cell| !cell.is_empty())
            .take(limit)
            .map(RawCell::render)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn sample_values_skips_empty_cells() {
        let mut table = Table::new("t", vec!["날짜".into(), "비고".into()]);
        table.rows.push(vec![RawCell::Empty, text("x")]);
        table.rows.push(vec![text("2025-04-23"), RawCell::Empty]);
        table.rows.push(vec![text("2025-04-24"), text("y")]);

        assert_eq!(
            table.sample_values("날짜", 10),
            vec!["2025-04-23".to_string(), "2025-04-24".to_string()]
        );
        assert_eq!(table.sample_values("없는컬럼", 10), Vec::<String>::new());
    }

    #[test]
    fn cell_lookup_by_column_name() {
        let mut table = Table::new("t", vec!["a".into(), "b".into()]);
        table.rows.push(vec![text("1"), text("2")]);
        assert_eq!(table.cell(0, "b"), Some(&text("2")));
        assert_eq!(table.cell(1, "b"), None);
        assert_eq!(table.cell(0, "c"), None);
    }
}
