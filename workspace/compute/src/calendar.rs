use chrono::{Datelike, Months, NaiveDate};

use crate::error::{ComputeError, Result};

/// Returns the number of days in the given month, or 0 when `month` is not 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    // Last day of the month is the day before the first of the next one
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .filter(|_| (1..=12).contains(&month))
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Resolves a fixed day-of-month inside a concrete month.
///
/// Days past the end of a short month clamp to its last day, so day 31 in
/// April is April 30 and day 29 in February is February 28 outside leap years.
/// Returns `None` for day 0 or an invalid month.
pub fn payment_date_in_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if day == 0 {
        return None;
    }
    let last_day = days_in_month(year, month);
    if last_day == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day.min(last_day))
}

/// First and last day of a month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ComputeError::Date(format!("invalid month {}-{}", year, month)))?;
    let end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
        .ok_or_else(|| ComputeError::Date(format!("invalid month {}-{}", year, month)))?;
    Ok((start, end))
}

/// Adds whole months to an anchor date, clamping to the end of shorter months.
/// Always counts from the anchor, so a series anchored on the 31st returns to
/// the 31st after passing through February.
pub fn add_months_clamped(anchor: NaiveDate, months: u32) -> Option<NaiveDate> {
    anchor.checked_add_months(Months::new(months))
}

/// Number of whole calendar months from `from` to `to` (negative when `to` is earlier).
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64)
}
