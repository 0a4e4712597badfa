use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::AppError;

/// Parses an upstream timestamp into UTC.
///
/// Accepts RFC 3339 and the minute-precision form ESPN uses
/// (`2025-01-11T19:00Z`). Anything else is an unexpected-structure error
/// attributed to `url`.
pub fn parse_timestamp(value: &str, url: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(AppError::api_unexpected_structure(
        format!("unparseable timestamp '{value}'"),
        url,
    ))
}

/// Parses a Unix epoch in seconds sent as a string
pub fn parse_epoch_seconds(value: &str, url: &str) -> Result<DateTime<Utc>, AppError> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or_else(|| {
            AppError::api_unexpected_structure(format!("unparseable epoch '{value}'"), url)
        })
}

/// Midnight UTC of a calendar day, used when a provider has no start time yet
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Calendar day on the host clock, the default for date-less game queries
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a score sent as a string. Empty means not started and maps to 0.
pub fn parse_score(value: Option<&str>, url: &str) -> Result<u32, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(0),
        Some(text) => text.parse::<u32>().map_err(|_| {
            AppError::api_unexpected_structure(format!("non-numeric score '{text}'"), url)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2024-04-01T17:10:00Z", "u").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-04-01T17:10:00+00:00");

        let ts = parse_timestamp("2024-04-01T12:10:00-05:00", "u").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-04-01T17:10:00+00:00");
    }

    #[test]
    fn test_parse_minute_precision() {
        let ts = parse_timestamp("2025-01-11T19:00Z", "u").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-01-11T19:00:00+00:00");
    }

    #[test]
    fn test_parse_naive_is_treated_as_utc() {
        let ts = parse_timestamp("2025-01-11T19:05:00", "u").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-01-11T19:05:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("tomorrow", "https://x.test").unwrap_err();
        assert!(matches!(err, AppError::ApiUnexpectedStructure { .. }));
    }

    #[test]
    fn test_parse_epoch_seconds() {
        let ts = parse_epoch_seconds("1736622000", "u").unwrap();
        assert_eq!(ts.timestamp(), 1_736_622_000);
        assert!(parse_epoch_seconds("abc", "u").is_err());
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score(None, "u").unwrap(), 0);
        assert_eq!(parse_score(Some(""), "u").unwrap(), 0);
        assert_eq!(parse_score(Some(" 7 "), "u").unwrap(), 7);
        assert!(parse_score(Some("seven"), "u").is_err());
        assert!(parse_score(Some("-1"), "u").is_err());
    }

    #[test]
    fn test_start_of_day() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        assert_eq!(start_of_day(date).to_rfc3339(), "2025-01-11T00:00:00+00:00");
    }
}
