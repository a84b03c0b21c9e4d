//! Timestamp normalization for feed headers and item ages.
//!
//! Feeds report times as `ddd, DD MMM YYYY HH:mm:ss <zone>` where the zone is
//! either a numeric offset (`+0700`, `+07:00`) or a letter code (`GMT`, `EST`,
//! military letters). RFC 2822 input goes through chrono; `+hh:mm` offsets
//! and `UTC` are handled here. The weekday is informational only; feeds get
//! it wrong often enough that a mismatch is retried without it.
//!
//! Unparseable input is kept verbatim and displayed as-is in both modes.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

/// Layout the aggregator emits, and the layout used for UTC round-trips.
pub const UTC_LAYOUT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Absolute short form shown in feed headers, e.g. `3:04 PM; 02 Jan`.
const SHORT_LAYOUT: &str = "%-I:%M %p; %d %b";

/// A feed-supplied timestamp after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum When {
    /// Parsed instant, held in UTC.
    Parsed(DateTime<Utc>),
    /// Neither accepted layout matched; the trimmed raw text.
    Unparsed(String),
}

/// Parse a feed timestamp, tolerating both accepted layouts.
pub fn parse_when(raw: &str) -> When {
    let trimmed = raw.trim();
    match parse_instant(trimmed) {
        Some(instant) => When::Parsed(instant),
        None => {
            if !trimmed.is_empty() {
                tracing::trace!(raw = %trimmed, "Unparseable timestamp, showing raw text");
            }
            When::Unparsed(trimmed.to_string())
        }
    }
}

impl When {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            When::Parsed(instant) => Some(*instant),
            When::Unparsed(_) => None,
        }
    }

    /// Absolute short form in the viewer's local zone.
    pub fn short(&self) -> String {
        self.short_in(&Local)
    }

    /// Absolute short form in an explicit zone.
    pub fn short_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            When::Parsed(instant) => instant.with_timezone(tz).format(SHORT_LAYOUT).to_string(),
            When::Unparsed(raw) => raw.clone(),
        }
    }

    /// The instant rendered back in the aggregator's UTC layout.
    pub fn utc_string(&self) -> String {
        match self {
            When::Parsed(instant) => instant.format(UTC_LAYOUT).to_string(),
            When::Unparsed(raw) => raw.clone(),
        }
    }

    /// Relative "time ago" form measured against `now`.
    pub fn ago(&self, now: DateTime<Utc>) -> String {
        match self {
            When::Parsed(instant) => {
                let delta = now.signed_duration_since(*instant).num_seconds();
                let span = humanize(delta.unsigned_abs());
                if delta < 0 {
                    format!("in {}", span)
                } else {
                    format!("{} ago", span)
                }
            }
            When::Unparsed(raw) => raw.clone(),
        }
    }
}

fn humanize(secs: u64) -> String {
    let exact_days = secs as f64 / 86_400.0;
    let minutes = (secs as f64 / 60.0).round() as u64;
    let hours = (secs as f64 / 3_600.0).round() as u64;
    let days = exact_days.round() as u64;
    let months = (exact_days / 30.436875).round() as u64;
    let years = (exact_days / 365.2425).round() as u64;

    if secs < 45 {
        "a few seconds".to_string()
    } else if minutes <= 1 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if hours <= 1 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{} hours", hours)
    } else if days <= 1 {
        "a day".to_string()
    } else if days < 26 {
        format!("{} days", days)
    } else if months <= 1 {
        "a month".to_string()
    } else if months < 11 {
        format!("{} months", months)
    } else if years <= 1 {
        "a year".to_string()
    } else {
        format!("{} years", years)
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let body = strip_weekday(s);
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc2822(body))
        .ok()
        .or_else(|| parse_extended(body))
        .map(|instant| instant.with_timezone(&Utc))
}

/// Drop a leading `Mon, ` if present.
fn strip_weekday(s: &str) -> &str {
    match s.split_once(',') {
        Some((day, rest)) if !day.is_empty() && day.chars().all(|c| c.is_ascii_alphabetic()) => {
            rest.trim_start()
        }
        _ => s,
    }
}

/// Zone forms RFC 2822 does not allow: `+hh:mm` offsets and `UTC`.
fn parse_extended(body: &str) -> Option<DateTime<FixedOffset>> {
    let (stamp, zone) = body.rsplit_once(' ')?;
    let naive = NaiveDateTime::parse_from_str(stamp.trim(), "%d %b %Y %H:%M:%S").ok()?;
    let offset = FixedOffset::east_opt(extended_offset_secs(zone)?)?;
    offset.from_local_datetime(&naive).single()
}

fn extended_offset_secs(zone: &str) -> Option<i32> {
    if zone.eq_ignore_ascii_case("UTC") {
        return Some(0);
    }
    let sign = match zone.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let (hh, mm) = zone[1..].split_once(':')?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hh) || !two_digits(mm) {
        return None;
    }
    let hours: i32 = hh.parse().ok()?;
    let minutes: i32 = mm.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    Some(sign * (hours * 3_600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_parse_numeric_offset() {
        let when = parse_when("Mon, 02 Jan 2006 15:04:05 -0700");
        assert_eq!(when.instant(), Some(utc("2006-01-02T22:04:05Z")));
    }

    #[test]
    fn test_parse_colon_offset() {
        let when = parse_when("Mon, 02 Jan 2006 15:04:05 +05:30");
        assert_eq!(when.instant(), Some(utc("2006-01-02T09:34:05Z")));
    }

    #[test]
    fn test_parse_letter_zones() {
        assert_eq!(
            parse_when("Mon, 02 Jan 2006 15:04:05 GMT").instant(),
            Some(utc("2006-01-02T15:04:05Z"))
        );
        assert_eq!(
            parse_when("Mon, 02 Jan 2006 15:04:05 EST").instant(),
            Some(utc("2006-01-02T20:04:05Z"))
        );
        assert_eq!(
            parse_when("Mon, 02 Jan 2006 15:04:05 z").instant(),
            Some(utc("2006-01-02T15:04:05Z"))
        );
    }

    #[test]
    fn test_parse_utc_and_colon_zero_offset() {
        assert_eq!(
            parse_when("Mon, 02 Jan 2006 15:04:05 UTC").instant(),
            Some(utc("2006-01-02T15:04:05Z"))
        );
        assert_eq!(
            parse_when("Mon, 02 Jan 2006 15:04:05 -00:00").instant(),
            Some(utc("2006-01-02T15:04:05Z"))
        );
    }

    #[test]
    fn test_wrong_weekday_with_colon_offset() {
        assert_eq!(
            parse_when("Sun, 02 Jan 2006 15:04:05 +01:00").instant(),
            Some(utc("2006-01-02T14:04:05Z"))
        );
    }

    #[test]
    fn test_parse_single_digit_day_and_no_weekday() {
        assert_eq!(
            parse_when("2 Jan 2006 15:04:05 +0000").instant(),
            Some(utc("2006-01-02T15:04:05Z"))
        );
    }

    #[test]
    fn test_wrong_weekday_is_tolerated() {
        assert_eq!(
            parse_when("Fri, 02 Jan 2006 15:04:05 GMT").instant(),
            Some(utc("2006-01-02T15:04:05Z"))
        );
    }

    #[test]
    fn test_unparseable_falls_back_to_raw() {
        let when = parse_when("  yesterday-ish ");
        assert_eq!(when, When::Unparsed("yesterday-ish".to_string()));
        assert_eq!(when.short_in(&Utc), "yesterday-ish");
        assert_eq!(when.ago(Utc::now()), "yesterday-ish");
    }

    #[test]
    fn test_rejects_bad_offsets() {
        assert!(parse_when("Mon, 02 Jan 2006 15:04:05 +07").instant().is_none());
        assert!(parse_when("Mon, 02 Jan 2006 15:04:05 +0799").instant().is_none());
        assert!(parse_when("Mon, 02 Jan 2006 15:04:05 Mars").instant().is_none());
        assert!(parse_when("Mon, 02 Jan 2006 15:04:05 +7:00").instant().is_none());
        assert!(parse_when("").instant().is_none());
    }

    #[test]
    fn test_short_form() {
        let when = parse_when("Mon, 02 Jan 2006 15:04:05 GMT");
        assert_eq!(when.short_in(&Utc), "3:04 PM; 02 Jan");

        let plus_two = FixedOffset::east_opt(2 * 3_600).unwrap();
        assert_eq!(when.short_in(&plus_two), "5:04 PM; 02 Jan");
    }

    #[test]
    fn test_short_form_morning() {
        let when = parse_when("Tue, 09 Mar 2021 00:30:00 +0000");
        assert_eq!(when.short_in(&Utc), "12:30 AM; 09 Mar");
    }

    #[test]
    fn test_ago_thresholds() {
        let base = utc("2024-06-01T12:00:00Z");
        let when = When::Parsed(base);
        let cases = [
            (Duration::seconds(10), "a few seconds ago"),
            (Duration::seconds(60), "a minute ago"),
            (Duration::minutes(5), "5 minutes ago"),
            (Duration::minutes(50), "an hour ago"),
            (Duration::hours(3), "3 hours ago"),
            (Duration::hours(30), "a day ago"),
            (Duration::days(4), "4 days ago"),
            (Duration::days(30), "a month ago"),
            (Duration::days(92), "3 months ago"),
            (Duration::days(400), "a year ago"),
            (Duration::days(365 * 3), "3 years ago"),
        ];
        for (elapsed, expected) in cases {
            assert_eq!(when.ago(base + elapsed), expected, "elapsed {:?}", elapsed);
        }
    }

    #[test]
    fn test_ago_future() {
        let base = utc("2024-06-01T12:00:00Z");
        let when = When::Parsed(base + Duration::hours(2));
        assert_eq!(when.ago(base), "in 2 hours");
    }

    proptest! {
        #[test]
        fn prop_round_trip_both_layouts(
            secs in 0i64..4_102_444_800, // 1970..2100
            offset_minutes in -(14 * 60i32)..=(14 * 60),
            colon in any::<bool>(),
        ) {
            let instant = DateTime::from_timestamp(secs, 0).unwrap();
            let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
            let layout = if colon {
                "%a, %d %b %Y %H:%M:%S %:z"
            } else {
                "%a, %d %b %Y %H:%M:%S %z"
            };
            let raw = instant.with_timezone(&offset).format(layout).to_string();

            let when = parse_when(&raw);
            prop_assert_eq!(when.instant(), Some(instant));
            prop_assert_eq!(when.utc_string(), instant.format(UTC_LAYOUT).to_string());
            prop_assert_eq!(parse_when(&when.utc_string()).instant(), Some(instant));
        }
    }
}
