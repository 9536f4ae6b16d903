//! Conversion of the site's Arabic relative-time phrases into absolute
//! timestamps.
//!
//! The listing detail pages only expose "published N hours/days ago" text;
//! downstream filtering needs a real timestamp. Rules are tried in a fixed
//! order and the first match wins. Anything unrecognized maps to a
//! three-days-ago default: an unparseable phrase is assumed to be too old to
//! matter, which biases the day filter toward exclusion.

use std::sync::LazyLock;

use chrono::{NaiveDateTime, TimeDelta};
use regex::Regex;

/// Output format of [`publish_timestamp`]: naive local time, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Age assumed when the phrase is missing or matches no rule.
const FALLBACK_DAYS: i64 = 3;

static HOURS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"نُشر منذ (\d+) ساعة").expect("valid regex"));
static TWO_DAYS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"نُشر منذ يومين").expect("valid regex"));
static ONE_DAY_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"نُشر منذ يوم").expect("valid regex"));
static DAYS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"نُشر منذ (\d+) أيام").expect("valid regex"));

/// Resolves a relative-time phrase against `now` and formats the result as
/// [`TIMESTAMP_FORMAT`].
///
/// Recognized phrasings, in match order: "N hours ago", the dual "two days
/// ago", the singular "one day ago", and the general "N days ago". The dual
/// form is tested before the singular because the singular pattern is its
/// lexical prefix. Absent, empty, or unmatched input (including out-of-range
/// counts) yields `now - 3 days`. This function never fails.
#[must_use]
pub fn publish_timestamp(relative: Option<&str>, now: NaiveDateTime) -> String {
    let delta = relative.map_or_else(fallback_delta, |phrase| {
        parse_delta(phrase).unwrap_or_else(fallback_delta)
    });

    let published = now.checked_sub_signed(delta).unwrap_or(now);
    published.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_delta(phrase: &str) -> Option<TimeDelta> {
    if let Some(captures) = HOURS_AGO.captures(phrase) {
        let hours: i64 = captures[1].parse().ok()?;
        return TimeDelta::try_hours(hours);
    }
    if TWO_DAYS_AGO.is_match(phrase) {
        return TimeDelta::try_days(2);
    }
    if ONE_DAY_AGO.is_match(phrase) {
        return TimeDelta::try_days(1);
    }
    if let Some(captures) = DAYS_AGO.captures(phrase) {
        let days: i64 = captures[1].parse().ok()?;
        return TimeDelta::try_days(days);
    }
    None
}

fn fallback_delta() -> TimeDelta {
    TimeDelta::try_days(FALLBACK_DAYS).expect("in-range constant")
}
