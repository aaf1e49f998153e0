//! Lenient date handling for API payloads.
//!
//! The API is not consistent about timestamp formats: dates arrive as
//! `YYYY-MM-DD`, as `YYYY-MM-DD HH:MM:SS`, as ISO-8601 with or without an
//! offset, or as RFC 2822 (`Wed, 10 Jan 2024 09:00:00 GMT`). Everything is
//! reduced to naive wall-clock values: a timestamp that carries an offset
//! keeps the wall-clock time written in it and the offset is dropped, so the
//! same instant reads the same whichever format it came in. Outgoing
//! timestamps always use [`API_DATETIME_FORMAT`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

pub const API_DATE_FORMAT: &str = "%Y-%m-%d";
pub const API_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_local());
    }
    parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(prefix) = s.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(prefix, API_DATE_FORMAT) {
            return Some(d);
        }
    }
    parse_datetime_only(s).map(|dt| dt.date())
}

// RFC 2822 dates don't start with YYYY-MM-DD.
fn parse_datetime_only(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc2822(s).ok().map(|dt| dt.naive_local())
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(API_DATETIME_FORMAT).to_string()
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format(API_DATE_FORMAT).to_string()
}

/// `Option<NaiveDate>` that tolerates `null`, `""` and full timestamps.
pub mod opt_date {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_str(&format_date(d)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse_date))
    }
}

/// Required `NaiveDate`, always written as `YYYY-MM-DD`.
pub mod date {
    use super::*;

    pub fn serialize<S: Serializer>(value: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_date(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("unrecognised date: {raw}")))
    }
}

/// Required `NaiveDateTime` in any of the accepted API formats.
pub mod datetime {
    use super::*;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_datetime(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_datetime(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {raw}")))
    }
}

/// Optional `NaiveDateTime`; unparseable values become `None`.
pub mod opt_datetime {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => s.serialize_str(&format_datetime(dt)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse_datetime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn accepts_api_formats() {
        let expected = dt(2024, 1, 10, 9, 0);
        assert_eq!(parse_datetime("2024-01-10 09:00:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-10T09:00:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-10T09:00:00.000"), Some(expected));
        assert_eq!(parse_datetime("Wed, 10 Jan 2024 09:00:00 GMT"), Some(expected));
    }

    #[test]
    fn offsets_keep_written_wall_clock() {
        let expected = dt(2024, 1, 10, 9, 0);
        assert_eq!(parse_datetime("2024-01-10T09:00:00-03:00"), Some(expected));
        assert_eq!(parse_datetime("Wed, 10 Jan 2024 09:00:00 -0300"), Some(expected));
        assert_eq!(
            parse_date("Wed, 10 Jan 2024 23:30:00 -0300"),
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
    }

    #[test]
    fn date_only_becomes_midnight() {
        assert_eq!(parse_datetime("2024-01-10"), Some(dt(2024, 1, 10, 0, 0)));
    }

    #[test]
    fn date_from_timestamp_prefix() {
        assert_eq!(
            parse_date("2024-03-05T12:00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_date("Tue, 05 Mar 2024 00:00:00 GMT"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn outgoing_format() {
        assert_eq!(format_datetime(&dt(2024, 1, 10, 9, 30)), "2024-01-10 09:30:00");
    }
}
