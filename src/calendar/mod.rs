pub mod availability;
pub mod holidays;
pub mod window;

pub use availability::{compute_available, korean_weekday, AvailableDate, VacationRange};
pub use holidays::{holiday_dates, holidays_for_window, holidays_for_year, Holiday};
pub use window::SchoolYearWindow;
