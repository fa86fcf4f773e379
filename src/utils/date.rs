use chrono::{NaiveDate, NaiveDateTime};

use crate::consts::{DATE_FORMAT, LEGACY_TIMESTAMP_FORMAT};
use crate::error::AppError;

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    let s = s.trim();
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| AppError::InvalidDate {
        input: s.to_string(),
    })
}

/// Parse a stored last-fetch value: a plain date, or an older UTC timestamp.
pub(crate) fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(d);
    }
    NaiveDateTime::parse_from_str(s, LEGACY_TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.date())
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
