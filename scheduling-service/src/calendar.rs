//! Calendar helpers (C1): enumerate a month's dates and classify
//! weekend/holiday days. The holiday set itself is always supplied by the
//! caller — fetching a production calendar is an external collaborator's
//! job, not the core's.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use shared::Employee;

/// Every date in `year`-`month`, in order.
pub fn all_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid year/month");
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid year/month");
    let days_in_month = (next_month_first - first).num_days();
    (0..days_in_month)
        .map(|offset| first + chrono::Duration::days(offset))
        .collect()
}

/// A day counts against the 24/7 rotation if it's Saturday/Sunday or in the
/// supplied holiday set.
pub fn is_weekend_or_holiday(day: NaiveDate, holidays: &HashSet<NaiveDate>) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun) || holidays.contains(&day)
}

/// Number of Monday-Friday days in the month that aren't holidays — the
/// production-calendar norm every on-duty employee's target is scaled from.
pub fn production_days(year: i32, month: u32, holidays: &HashSet<NaiveDate>) -> u32 {
    all_days(year, month)
        .into_iter()
        .filter(|d| d.weekday().num_days_from_monday() < 5 && !holidays.contains(d))
        .count() as u32
}

/// Number of Monday-Friday days in the month this employee is already
/// unavailable for (vacation or a manual block), used to shrink their
/// effective target.
pub fn blocked_working_days(emp: &Employee, year: i32, month: u32) -> u32 {
    all_days(year, month)
        .into_iter()
        .filter(|d| d.weekday().num_days_from_monday() < 5 && emp.is_blocked(*d))
        .count() as u32
}
