// Best-effort date parsing for the "Date"/"Week" column of long-format
// exports. Absence is a normal outcome: callers treat `None` as "no place
// in the timeline", never as a failed import.
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})").expect("valid ISO pattern"));

// Day/month order is always read as US, so `15/01/2024` is month 15.
static US_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})").expect("valid US pattern"));

const DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",  // 2024/01/15
    "%b %d, %Y", // Jan 15, 2024
    "%B %d, %Y", // January 15, 2024
    "%d %b %Y",  // 15 Jan 2024
    "%d %B %Y",  // 15 January 2024
    "%d-%b-%Y",  // 15-Jan-2024
    "%a %b %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%b %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
];

/// Parse a calendar date out of a free-form cell.
///
/// Tried in order: a `YYYY-M-D` prefix (anything after it, like a time, is
/// ignored), an `M/D/YYYY` prefix, then a fixed list of common calendar
/// formats including RFC 3339 and RFC 2822.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let cleaned = s.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_PREFIX.captures(cleaned) {
        if let Some(d) = ymd(&caps[1], &caps[2], &caps[3]) {
            return Some(d);
        }
    }

    if let Some(caps) = US_PREFIX.captures(cleaned) {
        if let Some(d) = ymd(&caps[3], &caps[1], &caps[2]) {
            return Some(d);
        }
    }

    parse_fallback(cleaned)
}

// Out-of-range months and days carry over: month 13 is January of the next
// year, day 0 is the last day of the previous month.
fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    let month: i32 = month.parse().ok()?;
    let day: i64 = day.parse().ok()?;
    let months = year.checked_mul(12)?.checked_add(month - 1)?;
    let first = NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)?;
    first.checked_add_signed(Duration::days(day - 1))
}

fn parse_fallback(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}
