use chrono::{Datelike, NaiveDate, Utc};

pub const MIN_WEEK: i32 = 1;
pub const MAX_WEEK: i32 = 53;

/// ISO week number and ISO week-based year for `date`.
pub fn iso_week_and_year(date: NaiveDate) -> (i32, i32) {
    let iso = date.iso_week();
    (iso.week() as i32, iso.year())
}

/// ISO week and year of today (UTC).
pub fn current_week_and_year() -> (i32, i32) {
    iso_week_and_year(Utc::now().date_naive())
}

/// Resolves raw `week`/`year` query values, falling back to the current
/// ISO week when either one is missing or not a number.
pub fn resolve_week_and_year(week: Option<&str>, year: Option<&str>) -> (i32, i32) {
    let parsed = week
        .and_then(|w| w.trim().parse::<i32>().ok())
        .zip(year.and_then(|y| y.trim().parse::<i32>().ok()));

    parsed.unwrap_or_else(current_week_and_year)
}

pub fn is_valid_week(week: i32) -> bool {
    (MIN_WEEK..=MAX_WEEK).contains(&week)
}
