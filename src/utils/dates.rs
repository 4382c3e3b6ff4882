use anyhow::{Context, Result};
use chrono::{Datelike, Days, Duration, NaiveDate, Utc};

/// Current calendar date in UTC, the same day boundary the stored records use.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Render a date as `YYYY-MM-DD`.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{value}', expected YYYY-MM-DD"))
}

/// `date` shifted by `days`, saturating at the ends of the calendar.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let offset = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(offset)
    } else {
        date.checked_sub_days(offset)
    };
    shifted.unwrap_or(if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

/// Signed whole days from `today` until `due`; negative when overdue.
pub fn days_left(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Monday of the ISO week containing `date`.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(offset)
}
