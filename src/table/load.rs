use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use std::path::Path;
use tracing::debug;

use super::{RawCell, Table};

/// Load one contributed spreadsheet into a [`Table`], dispatching on the
/// file extension. The first row is taken as the header row.
pub fn load_table(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" => load_xlsx(path)?,
        "csv" => load_csv(path)?,
        other => return Err(anyhow!("unsupported file type `{}`: {:?}", other, path)),
    };

    debug!(
        table = %table.name,
        columns = table.columns.len(),
        rows = table.rows.len(),
        "loaded"
    );
    Ok(table)
}

/// First worksheet only; that is where every contributed file keeps its data.
fn load_xlsx(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("opening workbook {:?}", path))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no worksheets: {:?}", path))?
        .with_context(|| format!("reading first worksheet of {:?}", path))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| anyhow!("worksheet is empty: {:?}", path))?;

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(cell, idx))
        .collect();

    let mut table = Table::new(file_stem(path), columns);
    for row in rows {
        table.rows.push(row.iter().map(convert_cell).collect());
    }
    Ok(table)
}

fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {:?}", path))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("reading CSV header of {:?}", path))?
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = name.trim();
            if name.is_empty() {
                format!("column_{}", idx)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut table = Table::new(file_stem(path), columns);
    for record in reader.records() {
        let record = record.with_context(|| format!("reading CSV record in {:?}", path))?;
        table
            .rows
            .push(record.iter().map(convert_csv_field).collect());
    }
    Ok(table)
}

fn file_stem(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                RawCell::Empty
            } else {
                RawCell::Text(s.to_string())
            }
        }
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => RawCell::Date(dt.date()),
            None => match cell.as_date() {
                Some(d) => RawCell::Date(d),
                None => RawCell::Text(cell.to_string()),
            },
        },
        other => RawCell::Text(other.to_string()),
    }
}

fn convert_csv_field(field: &str) -> RawCell {
    let v = field.trim();
    if v.is_empty() {
        return RawCell::Empty;
    }
    // Mirror the spreadsheet loader: numeric-looking cells become numbers,
    // everything else stays text for the parser cascade to deal with.
    if let Ok(i) = v.parse::<i64>() {
        return RawCell::Number(i as f64);
    }
    if let Ok(f) = v.parse::<f64>() {
        return RawCell::Number(f);
    }
    RawCell::Text(v.to_string())
}

/// Header cells can legitimately be numbers (travel-log exports use row
/// numbers as headers); keep the integer form so the classifier can tell.
fn header_name(cell: &Data, idx: usize) -> String {
    match cell {
        Data::Empty => format!("column_{}", idx),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Int(i) => format!("{}", i),
        other => {
            let name = other.to_string().trim().to_string();
            if name.is_empty() {
                format!("column_{}", idx)
            } else {
                name
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn csv_loads_with_headers_and_types() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("leave.csv");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "이름,날짜,일수")?;
        writeln!(file, "김교사,2025-04-23,1")?;
        writeln!(file, "이교사,,2")?;
        drop(file);

        let table = load_table(&path)?;
        assert_eq!(table.columns, vec!["이름", "날짜", "일수"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0][1],
            RawCell::Text("2025-04-23".to_string())
        );
        assert_eq!(table.rows[0][2], RawCell::Number(1.0));
        assert_eq!(table.rows[1][1], RawCell::Empty);
        Ok(())
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_table(Path::new("notes.txt")).unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }
}
