use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

/// Fallback layouts tried, in order, after RFC3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%SZ"];
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Returned when a lead date field matches none of the accepted representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    pub input: String,
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to parse date: {}", self.input)
    }
}

impl std::error::Error for DateParseError {}

/// Parses the date representations CRM exports put in lead records.
///
/// # Accepted inputs
///
/// - Epoch milliseconds (`"1700000000000"`), recognized by the absence of `-`.
/// - RFC3339 with any zone offset (`"2023-01-15T10:30:00+02:00"`).
/// - UTC timestamps without fractional seconds (`"2023-01-15T10:30:00Z"`).
/// - Date only (`"2023-01-15"` or `"2023/01/15"`), taken as midnight UTC.
///
/// A negative epoch contains a `-`, so it is tried against the date layouts
/// and rejected.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, DateParseError> {
    if !input.contains('-') {
        if let Some(instant) = input
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
        {
            return Ok(instant);
        }
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    for format in NAIVE_DATE_FORMATS {
        if let Some(naive) = NaiveDate::parse_from_str(input, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(naive.and_utc());
        }
    }

    Err(DateParseError {
        input: input.to_string(),
    })
}
