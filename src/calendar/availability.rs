use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use super::holidays::{holiday_dates, Holiday};
use super::window::SchoolYearWindow;

/// Inclusive vacation span; unset (either end missing) excludes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VacationRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl VacationRange {
    pub const UNSET: Self = VacationRange {
        start: None,
        end: None,
    };

    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        VacationRange {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }
}

/// One remaining weekday, paired with its display weekday name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableDate {
    pub date: NaiveDate,
    pub weekday_name: &'static str,
}

/// Korean single-syllable weekday name, 월 through 일.
pub fn korean_weekday(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "월",
        Weekday::Tue => "화",
        Weekday::Wed => "수",
        Weekday::Thu => "목",
        Weekday::Fri => "금",
        Weekday::Sat => "토",
        Weekday::Sun => "일",
    }
}

/// Enumerate the window and keep every weekday that is not a holiday, not
/// occupied, not manually excluded, and not inside either vacation range.
/// Pure and order-stable: identical inputs give an identical ascending list.
pub fn compute_available(
    occupied: &BTreeSet<NaiveDate>,
    window: SchoolYearWindow,
    holidays: &[Holiday],
    summer: VacationRange,
    winter: VacationRange,
    excluded: &BTreeSet<NaiveDate>,
) -> Vec<AvailableDate> {
    let holiday_set = holiday_dates(holidays);

    let available: Vec<AvailableDate> = window
        .iter_days()
        .filter(|d| d.weekday().num_days_from_monday() < 5)
        .filter(|d| !holiday_set.contains(d))
        .filter(|d| !occupied.contains(d))
        .filter(|d| !excluded.contains(d))
        .filter(|d| !summer.contains(*d))
        .filter(|d| !winter.contains(*d))
        .map(|date| AvailableDate {
            date,
            weekday_name: korean_weekday(date),
        })
        .collect();

    debug!(
        window_start = %window.start,
        window_end = %window.end,
        occupied = occupied.len(),
        available = available.len(),
        "availability computed"
    );
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window_2025() -> SchoolYearWindow {
        SchoolYearWindow::anchored_to(date(2025, 4, 1))
    }

    #[test]
    fn empty_inputs_yield_every_weekday_in_the_window() {
        let available = compute_available(
            &BTreeSet::new(),
            window_2025(),
            &[],
            VacationRange::UNSET,
            VacationRange::UNSET,
            &BTreeSet::new(),
        );

        let weekdays = window_2025()
            .iter_days()
            .filter(|d| d.weekday().num_days_from_monday() < 5)
            .count();
        assert_eq!(available.len(), weekdays);
        assert!(available
            .iter()
            .all(|a| a.date.weekday() != Weekday::Sat && a.date.weekday() != Weekday::Sun));
        assert!(available.windows(2).all(|p| p[0].date < p[1].date));
    }

    #[test]
    fn school_year_scenario() {
        let occupied: BTreeSet<_> = [date(2025, 4, 23)].into_iter().collect();
        let excluded: BTreeSet<_> = [date(2025, 4, 24)].into_iter().collect();
        let holidays = [Holiday {
            date: date(2025, 5, 5),
            name: "어린이날",
        }];
        let summer = VacationRange::new(date(2025, 7, 26), date(2025, 8, 19));

        let available = compute_available(
            &occupied,
            window_2025(),
            &holidays,
            summer,
            VacationRange::UNSET,
            &excluded,
        );
        let dates: BTreeSet<_> = available.iter().map(|a| a.date).collect();

        assert!(!dates.contains(&date(2025, 4, 23)));
        assert!(!dates.contains(&date(2025, 4, 24)));
        assert!(!dates.contains(&date(2025, 5, 5)));
        // Every date of the inclusive summer range is gone, weekday or not.
        let mut day = date(2025, 7, 26);
        while day <= date(2025, 8, 19) {
            assert!(!dates.contains(&day), "{} should be excluded", day);
            day = day.succ_opt().unwrap();
        }
        // A plain Tuesday stays.
        assert!(dates.contains(&date(2025, 4, 22)));
        // The weekdays hugging the vacation bounds stay.
        assert!(dates.contains(&date(2025, 7, 25)));
        assert!(dates.contains(&date(2025, 8, 20)));
    }

    #[test]
    fn weekday_names_are_korean() {
        let available = compute_available(
            &BTreeSet::new(),
            window_2025(),
            &[],
            VacationRange::UNSET,
            VacationRange::UNSET,
            &BTreeSet::new(),
        );
        // 2025-03-03 is a Monday.
        let first = &available[0];
        assert_eq!(first.date, date(2025, 3, 3));
        assert_eq!(first.weekday_name, "월");
    }

    #[test]
    fn half_set_vacation_range_excludes_nothing() {
        let half = VacationRange {
            start: Some(date(2025, 7, 26)),
            end: None,
        };
        assert!(!half.contains(date(2025, 7, 30)));
    }

    #[test]
    fn identical_inputs_are_order_stable() {
        let occupied: BTreeSet<_> = [date(2025, 6, 2), date(2025, 6, 4)].into_iter().collect();
        let a = compute_available(
            &occupied,
            window_2025(),
            &[],
            VacationRange::UNSET,
            VacationRange::UNSET,
            &BTreeSet::new(),
        );
        let b = compute_available(
            &occupied,
            window_2025(),
            &[],
            VacationRange::UNSET,
            VacationRange::UNSET,
            &BTreeSet::new(),
        );
        assert_eq!(a, b);
    }
}
