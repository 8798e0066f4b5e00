//! Display helpers for trip dates and saved-POI schedule times.
//!
//! Stored values are free-form strings, usually ISO 8601. Date-times carrying
//! an offset keep their own wall-clock time; nothing is converted to the
//! local zone. Input that cannot be parsed is shown unchanged.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// 24-hour `HH:MM` for a stored date-time.
///
/// # Examples
/// ```
/// use wayfarer_core::schedule::format_time;
///
/// assert_eq!(format_time(Some("2025-06-01T09:05")), "09:05");
/// assert_eq!(format_time(None), "");
/// ```
#[must_use]
pub fn format_time(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        None => String::new(),
        Some(value) => parse_date_time(value)
            .map_or_else(|| value.to_owned(), |parsed| parsed.format("%H:%M").to_string()),
    }
}

/// `DD/MM/YYYY` for a stored date or date-time.
///
/// # Examples
/// ```
/// use wayfarer_core::schedule::format_date;
///
/// assert_eq!(format_date(Some("2025-06-01")), "01/06/2025");
/// assert_eq!(format_date(Some("soon")), "soon");
/// ```
#[must_use]
pub fn format_date(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return String::new();
    };
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_date_time(value).map(|parsed| parsed.date()))
        .map_or_else(|| value.to_owned(), |date| date.format("%d/%m/%Y").to_string())
}

/// The current local time as `YYYY-MM-DDTHH:MM`, the value format of an HTML
/// `datetime-local` input.
#[must_use]
pub fn local_now_minutes() -> String {
    Local::now().format("%Y-%m-%dT%H:%M").to_string()
}
