use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::calendar::{korean_weekday, AvailableDate};

/// Display form used throughout the reports, e.g. `2025년 4월 23일 (수)`.
pub fn format_korean_date(date: NaiveDate) -> String {
    format!(
        "{}년 {}월 {}일 ({})",
        date.year(),
        date.month(),
        date.day(),
        korean_weekday(date)
    )
}

/// Sheet 1: the occupied dates collected from the uploads.
pub fn write_occupied_csv(path: &Path, occupied: &BTreeSet<NaiveDate>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating occupied-dates sheet {:?}", path))?;
    writer.write_record(["날짜", "요일", "표시"])?;
    for date in occupied {
        writer.write_record([
            date.format("%Y-%m-%d").to_string(),
            korean_weekday(*date).to_string(),
            format_korean_date(*date),
        ])?;
    }
    writer.flush().context("flushing occupied-dates sheet")?;
    info!(?path, rows = occupied.len(), "occupied sheet written");
    Ok(())
}

/// Sheet 2: the weekdays still available for the meeting.
pub fn write_available_csv(path: &Path, available: &[AvailableDate]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating available-dates sheet {:?}", path))?;
    writer.write_record(["날짜", "요일", "표시"])?;
    for day in available {
        writer.write_record([
            day.date.format("%Y-%m-%d").to_string(),
            day.weekday_name.to_string(),
            format_korean_date(day.date),
        ])?;
    }
    writer.flush().context("flushing available-dates sheet")?;
    info!(?path, rows = available.len(), "available sheet written");
    Ok(())
}

/// Machine-readable run summary, written next to the two sheets.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub school: Option<String>,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub tables: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub failure_examples: Vec<String>,
    /// Successful extractions per source column.
    pub column_hits: BTreeMap<String, usize>,
    pub occupied_count: usize,
    pub holiday_count: usize,
    pub available_count: usize,
    /// Available weekdays per `YYYY-MM` month.
    pub monthly_available: BTreeMap<String, usize>,
}

pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating summary file {:?}", path))?;
    serde_json::to_writer_pretty(file, summary).context("writing run summary")?;
    info!(?path, "summary written");
    Ok(())
}

/// Available weekdays bucketed by month, ascending.
pub fn monthly_counts(available: &[AvailableDate]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for day in available {
        *counts
            .entry(day.date.format("%Y-%m").to_string())
            .or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn korean_display_form() {
        // 2025-04-23 is a Wednesday.
        assert_eq!(format_korean_date(date(2025, 4, 23)), "2025년 4월 23일 (수)");
        assert_eq!(format_korean_date(date(2025, 3, 1)), "2025년 3월 1일 (토)");
    }

    #[test]
    fn sheets_carry_weekday_and_display_columns() -> Result<()> {
        let dir = tempdir()?;
        let occupied: BTreeSet<_> = [date(2025, 4, 23)].into_iter().collect();
        let occupied_path = dir.path().join("occupied.csv");
        write_occupied_csv(&occupied_path, &occupied)?;

        let text = std::fs::read_to_string(&occupied_path)?;
        assert!(text.contains("2025-04-23"));
        assert!(text.contains("수"));
        assert!(text.contains("2025년 4월 23일 (수)"));

        let available = vec![AvailableDate {
            date: date(2025, 4, 22),
            weekday_name: "화",
        }];
        let available_path = dir.path().join("available.csv");
        write_available_csv(&available_path, &available)?;
        let text = std::fs::read_to_string(&available_path)?;
        assert!(text.contains("2025-04-22"));
        assert!(text.contains("화"));
        Ok(())
    }

    #[test]
    fn monthly_buckets_are_ascending() {
        let available = vec![
            AvailableDate {
                date: date(2025, 3, 3),
                weekday_name: "월",
            },
            AvailableDate {
                date: date(2025, 3, 4),
                weekday_name: "화",
            },
            AvailableDate {
                date: date(2025, 4, 1),
                weekday_name: "화",
            },
        ];
        let counts = monthly_counts(&available);
        assert_eq!(counts.get("2025-03"), Some(&2));
        assert_eq!(counts.get("2025-04"), Some(&1));
        assert_eq!(counts.keys().next(), Some(&"2025-03".to_string()));
    }
}
