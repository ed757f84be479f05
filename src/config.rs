use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::calendar::VacationRange;

/// Per-school schedule configuration, loaded from a YAML file.
///
/// Everything is optional: with no config at all the pipeline runs with no
/// vacations, no manual exclusions, and automatic column classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// School label, used in logs and the report header.
    pub school: Option<String>,
    pub summer_vacation: Option<DateRange>,
    pub winter_vacation: Option<DateRange>,
    pub excluded_dates: Vec<NaiveDate>,
    /// Manual date-column selection; overrides classification entirely.
    pub date_columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ScheduleConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let config: ScheduleConfig =
            serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))?;
        info!(?path, "config loaded");
        Ok(config)
    }

    /// Missing file is not an error, just the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(?path, "no config file; using defaults");
            return Ok(ScheduleConfig::default());
        }
        Self::load(path)
    }

    pub fn summer_range(&self) -> VacationRange {
        to_vacation(self.summer_vacation)
    }

    pub fn winter_range(&self) -> VacationRange {
        to_vacation(self.winter_vacation)
    }

    pub fn excluded_set(&self) -> BTreeSet<NaiveDate> {
        self.excluded_dates.iter().copied().collect()
    }
}

fn to_vacation(range: Option<DateRange>) -> VacationRange {
    match range {
        Some(r) => VacationRange::new(r.start, r.end),
        None => VacationRange::UNSET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn yaml_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("freedays.yaml");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "school: 한빛초등학교")?;
        writeln!(file, "summer_vacation: {{ start: 2025-07-26, end: 2025-08-19 }}")?;
        writeln!(file, "excluded_dates: [2025-04-24]")?;
        writeln!(file, "date_columns: [출장기간]")?;
        drop(file);

        let config = ScheduleConfig::load(&path)?;
        assert_eq!(config.school.as_deref(), Some("한빛초등학교"));
        assert!(config.summer_range().contains(date(2025, 8, 1)));
        assert!(!config.winter_range().contains(date(2026, 1, 10)));
        assert_eq!(config.excluded_set().len(), 1);
        assert_eq!(
            config.date_columns,
            Some(vec!["출장기간".to_string()])
        );
        Ok(())
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = ScheduleConfig::load_or_default(&dir.path().join("absent.yaml"))?;
        assert_eq!(config, ScheduleConfig::default());
        assert!(!config.summer_range().contains(date(2025, 8, 1)));
        Ok(())
    }
}
