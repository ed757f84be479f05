use chrono::{Datelike, NaiveDate};

/// The Korean school year: March 1 through the last day of February.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchoolYearWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SchoolYearWindow {
    /// Window containing `today`. From March onward the window starts this
    /// calendar year; January and February still belong to the previous
    /// school year.
    pub fn anchored_to(today: NaiveDate) -> Self {
        let start_year = if today.month() >= 3 {
            today.year()
        } else {
            today.year() - 1
        };
        let start = NaiveDate::from_ymd_opt(start_year, 3, 1).expect("March 1 always exists");
        let end = NaiveDate::from_ymd_opt(start_year + 1, 3, 1)
            .expect("March 1 always exists")
            .pred_opt()
            .expect("the day before March 1 always exists");
        SchoolYearWindow { start, end }
    }

    /// The two calendar years the window touches.
    pub fn years(&self) -> (i32, i32) {
        (self.start.year(), self.end.year())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the window, ascending.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}
