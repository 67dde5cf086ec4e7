//! Absolute and relative date normalization.
//!
//! Registry pages show relative text ("3 days ago") and, on hover targets,
//! an absolute `title` such as `"Apr 18, 2024 4:07 PM UTC"`.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

const ABSOLUTE_FORMAT: &str = "%b %d, %Y %I:%M %p";

static RELATIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(minute|hour|day|week|month|year)s?\s+ago")
        .expect("relative date regex must compile")
});

/// Parse an absolute `"<Mon> <day>, <year> <hh>:<mm> <AM|PM> UTC"` string.
pub fn try_parse_absolute_date(raw: &str) -> Option<DateTime<Utc>> {
    let cleaned = raw.replace(" UTC", "");
    NaiveDateTime::parse_from_str(cleaned.trim(), ABSOLUTE_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse an absolute date, falling back to the current time on bad input.
pub fn parse_absolute_date(raw: &str) -> DateTime<Utc> {
    try_parse_absolute_date(raw).unwrap_or_else(|| {
        warn!("Could not parse absolute date '{}', using current time", raw);
        Utc::now()
    })
}

/// Parse relative text such as `"2 days ago"` against `base`.
///
/// Months count as 30 days and years as 365 days. Unrecognized text yields
/// `base` unchanged.
pub fn parse_relative_date(raw: &str, base: DateTime<Utc>) -> DateTime<Utc> {
    let text = raw.trim().to_lowercase();

    if text.contains("just now") || text.contains("moments ago") {
        return base;
    }

    if text.contains("yesterday") {
        let midnight = base
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(base);
        return midnight - Duration::days(1);
    }

    if let Some(caps) = RELATIVE_PATTERN.captures(&text) {
        let offset = caps[1]
            .parse::<i64>()
            .ok()
            .and_then(|value| unit_offset(&caps[2], value));
        if let Some(result) = offset.and_then(|delta| base.checked_sub_signed(delta)) {
            return result;
        }
    }

    warn!("Could not parse relative date '{}', using base time", raw);
    base
}

/// Resolve a timestamp, preferring an absolute source when one is present.
pub fn resolve_timestamp(
    absolute: Option<&str>,
    relative: &str,
    base: DateTime<Utc>,
) -> DateTime<Utc> {
    match absolute.map(str::trim).filter(|s| !s.is_empty()) {
        Some(absolute) => parse_absolute_date(absolute),
        None => parse_relative_date(relative, base),
    }
}

fn unit_offset(unit: &str, value: i64) -> Option<Duration> {
    match unit {
        "minute" => Duration::try_minutes(value),
        "hour" => Duration::try_hours(value),
        "day" => Duration::try_days(value),
        "week" => Duration::try_weeks(value),
        "month" => value.checked_mul(30).and_then(Duration::try_days),
        "year" => value.checked_mul(365).and_then(Duration::try_days),
        _ => None,
    }
}
