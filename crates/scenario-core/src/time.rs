use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{DashboardError, DashboardResult};

/// Date format the backend binds `from`/`to` with (UTC, hour granularity).
pub const WIRE_DATE_FORMAT: &str = "%Y_%m_%dT%H";

const WIRE_DAY_FORMAT: &str = "%Y_%m_%d";

/// Encode an instant for the wire, truncated to the hour.
pub fn format_wire_date(at: DateTime<Utc>) -> String {
    at.format(WIRE_DATE_FORMAT).to_string()
}

/// Encode a whole day for the wire. Day-level requests always start at `T00`.
pub fn wire_day(day: NaiveDate) -> String {
    format!("{}T00", day.format(WIRE_DAY_FORMAT))
}

/// Inverse of [`format_wire_date`].
pub fn parse_wire_date(raw: &str) -> DashboardResult<DateTime<Utc>> {
    let invalid = || DashboardError::invalid(format!("'{}' is not a YYYY_MM_DDTHH date", raw));

    let (day, hour) = raw.split_once('T').ok_or_else(invalid)?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let day = NaiveDate::parse_from_str(day, WIRE_DAY_FORMAT).map_err(|_| invalid())?;
    let hour: u32 = hour.parse().map_err(|_| invalid())?;

    day.and_hms_opt(hour, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(invalid)
}

/// Resolve a payload timestamp (RFC 3339, any offset) to a UTC instant.
///
/// `field` names where the value came from so a failure points at the
/// offending element.
pub fn parse_timestamp(raw: &str, field: &str) -> DashboardResult<DateTime<Utc>> {
    parse_timestamp_at(raw, || field.to_string())
}

/// Like [`parse_timestamp`], but only builds the field path on failure.
pub fn parse_timestamp_at<F>(raw: &str, field: F) -> DashboardResult<DateTime<Utc>>
where
    F: FnOnce() -> String,
{
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            DashboardError::malformed(format!("unparseable timestamp '{}' in {}: {}", raw, field(), e))
        })
}

/// Default date range offered by the forms: the last 24 hours, as days.
pub fn default_range(now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
    let from = (now - Duration::hours(24)).date_naive();
    (from, now.date_naive())
}
