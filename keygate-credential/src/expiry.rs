//! Expiry timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{CredentialError, CredentialResult};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses an expiry string into a UTC instant.
///
/// Accepts RFC 3339 as well as naive date-times and bare dates. Naive values
/// are read as UTC; a bare date means midnight at the start of that day.
pub fn parse_expiry(raw: &str) -> CredentialResult<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(CredentialError::InvalidExpiry("expiry is empty".to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
        }
    }

    Err(CredentialError::InvalidExpiry(format!(
        "'{s}' is not a recognised timestamp"
    )))
}
