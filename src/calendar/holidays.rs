use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::warn;

use super::window::SchoolYearWindow;

/// A South-Korean public holiday: the date plus its official name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: &'static str,
}

/// Compiled-in reference tables, (month, day, name) per calendar year.
/// Substitute holidays (대체공휴일) are already folded in.
static TABLE_2024: &[(u32, u32, &str)] = &[
    (1, 1, "신정"),
    (2, 9, "설날 연휴"),
    (2, 10, "설날"),
    (2, 11, "설날 연휴"),
    (2, 12, "대체공휴일"),
    (3, 1, "삼일절"),
    (4, 10, "국회의원 선거일"),
    (5, 5, "어린이날"),
    (5, 6, "대체공휴일"),
    (5, 15, "부처님오신날"),
    (6, 6, "현충일"),
    (8, 15, "광복절"),
    (9, 16, "추석 연휴"),
    (9, 17, "추석"),
    (9, 18, "추석 연휴"),
    (10, 3, "개천절"),
    (10, 9, "한글날"),
    (12, 25, "기독탄신일"),
];

static TABLE_2025: &[(u32, u32, &str)] = &[
    (1, 1, "신정"),
    (1, 28, "설날 연휴"),
    (1, 29, "설날"),
    (1, 30, "설날 연휴"),
    (3, 1, "삼일절"),
    (3, 3, "대체공휴일"),
    (5, 5, "어린이날"),
    (5, 5, "부처님오신날"),
    (5, 6, "대체공휴일"),
    (6, 6, "현충일"),
    (8, 15, "광복절"),
    (10, 3, "개천절"),
    (10, 5, "추석 연휴"),
    (10, 6, "추석"),
    (10, 7, "추석 연휴"),
    (10, 8, "대체공휴일"),
    (10, 9, "한글날"),
    (12, 25, "기독탄신일"),
];

static TABLE_2026: &[(u32, u32, &str)] = &[
    (1, 1, "신정"),
    (2, 16, "설날 연휴"),
    (2, 17, "설날"),
    (2, 18, "설날 연휴"),
    (3, 1, "삼일절"),
    (3, 2, "대체공휴일"),
    (5, 5, "어린이날"),
    (5, 24, "부처님오신날"),
    (5, 25, "대체공휴일"),
    (6, 3, "전국동시지방선거"),
    (6, 6, "현충일"),
    (8, 15, "광복절"),
    (8, 17, "대체공휴일"),
    (9, 24, "추석 연휴"),
    (9, 25, "추석"),
    (9, 26, "추석 연휴"),
    (10, 3, "개천절"),
    (10, 5, "대체공휴일"),
    (10, 9, "한글날"),
    (12, 25, "기독탄신일"),
];

static TABLE_2027: &[(u32, u32, &str)] = &[
    (1, 1, "신정"),
    (2, 6, "설날 연휴"),
    (2, 7, "설날"),
    (2, 8, "설날 연휴"),
    (2, 9, "대체공휴일"),
    (3, 1, "삼일절"),
    (5, 5, "어린이날"),
    (5, 13, "부처님오신날"),
    (6, 6, "현충일"),
    (8, 15, "광복절"),
    (8, 16, "대체공휴일"),
    (9, 14, "추석 연휴"),
    (9, 15, "추석"),
    (9, 16, "추석 연휴"),
    (10, 3, "개천절"),
    (10, 4, "대체공휴일"),
    (10, 9, "한글날"),
    (10, 11, "대체공휴일"),
    (12, 25, "기독탄신일"),
    (12, 27, "대체공휴일"),
];

fn year_table(year: i32) -> Option<&'static [(u32, u32, &'static str)]> {
    match year {
        2024 => Some(TABLE_2024),
        2025 => Some(TABLE_2025),
        2026 => Some(TABLE_2026),
        2027 => Some(TABLE_2027),
        _ => None,
    }
}

/// Holidays for one calendar year. A year without a table contributes
/// nothing; the computation still runs, just without holiday exclusion.
pub fn holidays_for_year(year: i32) -> Vec<Holiday> {
    let Some(table) = year_table(year) else {
        warn!(year, "no holiday table for this year; holidays not excluded");
        return Vec::new();
    };
    table
        .iter()
        .filter_map(|&(month, day, name)| {
            NaiveDate::from_ymd_opt(year, month, day).map(|date| Holiday { date, name })
        })
        .collect()
}

/// Holidays for the two calendar years a school-year window touches.
pub fn holidays_for_window(window: SchoolYearWindow) -> Vec<Holiday> {
    let (first, second) = window.years();
    let mut all = holidays_for_year(first);
    all.extend(holidays_for_year(second));
    all
}

/// Just the dates, for the availability filter.
pub fn holiday_dates(holidays: &[Holiday]) -> BTreeSet<NaiveDate> {
    holidays.iter().map(|h| h.date).collect()
}
