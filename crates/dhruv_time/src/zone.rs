//! Fixed-offset timezone designators and local → UTC resolution.
//!
//! Accepted forms: `UTC`, `GMT`, `Z`, `+05:30`, `-0400`, `+5`, and decimal
//! hours such as `5.5` or `-3.75`. Named IANA zones are out of scope; callers
//! resolve them to an offset beforehand.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::TimeError;

const MAX_OFFSET_SECONDS: i32 = 14 * 3600;

/// Parse a timezone designator into a fixed UTC offset.
pub fn parse_offset(designator: &str) -> Result<FixedOffset, TimeError> {
    let s = designator.trim();
    let invalid = || TimeError::InvalidOffset(designator.to_string());

    if s.is_empty() {
        return Err(invalid());
    }
    if matches!(s.to_ascii_uppercase().as_str(), "UTC" | "GMT" | "Z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let seconds = if s.contains('.') && !s.contains(':') {
        let hours: f64 = s.parse().map_err(|_| invalid())?;
        if !hours.is_finite() {
            return Err(invalid());
        }
        (hours * 3600.0).round() as i32
    } else {
        let (sign, rest) = match s.as_bytes()[0] {
            b'+' => (1, &s[1..]),
            b'-' => (-1, &s[1..]),
            _ => (1, s),
        };
        let (h, m) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None if rest.len() == 4 => rest.split_at(2),
            None => (rest, "0"),
        };
        let h: i32 = h.parse().map_err(|_| invalid())?;
        let m: i32 = m.parse().map_err(|_| invalid())?;
        if !(0..60).contains(&m) || h < 0 {
            return Err(invalid());
        }
        sign * (h * 3600 + m * 60)
    };

    if seconds.abs() > MAX_OFFSET_SECONDS {
        return Err(invalid());
    }
    FixedOffset::east_opt(seconds).ok_or_else(invalid)
}

/// Combine a local wall-clock date/time with its offset into a UTC instant.
pub fn local_to_utc(
    date: NaiveDate,
    time: NaiveTime,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, TimeError> {
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| TimeError::InvalidCalendar(format!("{date} {time} {offset}")))
}
