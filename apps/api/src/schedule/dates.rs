//! Calendar helpers shared by the schedule builder, the training log and the
//! companion-document generators.
//!
//! All dates are plain calendar dates (`NaiveDate`). The upstream workflow sends
//! ISO dates, but hand-entered US dates and full timestamps also show up, so
//! `parse_date` accepts all three. Anything else is rejected.

use chrono::{DateTime, Datelike, Duration, NaiveDate};

/// Accepted input layouts, tried in order.
const INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Values the workflow sends when an optional date field was left blank.
const EMPTY_MARKERS: &[&str] = &["", "null", "undefined"];

/// Parses a calendar date from a request field.
///
/// Returns `None` for anything that is not a real date. Callers turn that into
/// a validation error instead of propagating a garbage date downstream.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for format in INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Collapses blank / `"null"` / `"undefined"` strings to `None`.
pub fn normalize_optional(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|s| !EMPTY_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m)))
}

/// `MM/DD/YYYY`, the layout printed on the log and the certificates.
pub fn format_us(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// `MM-DD-YYYY`, the date form the companion generators put in file names.
#[cfg(test)]
pub fn format_file(date: NaiveDate) -> String {
    date.format("%m-%d-%Y").to_string()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Advances `date` by `years` calendar years.
///
/// A Feb 29 that lands in a non-leap year rolls over to Mar 1 rather than
/// clamping to Feb 28. Returns `None` only when the result is outside the
/// range chrono can represent.
pub fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    date.with_year(year).or_else(|| {
        // Only Feb 29 can fail here: roll over into March.
        NaiveDate::from_ymd_opt(year, 3, 1)
    })
}
