use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A date as it arrives from source metadata, before normalization.
#[derive(Debug, Clone)]
pub enum DateLike<'a> {
    /// Free-text or ISO-ish date string.
    Text(&'a str),
    /// UNIX timestamp in seconds.
    Timestamp(i64),
    /// Already-parsed calendar date.
    Date(NaiveDate),
    /// Already-parsed instant.
    DateTime(DateTime<Utc>),
}

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Best-effort date string parse: an ordered cascade of the formats that
/// actually occur in scholarly metadata, most specific first.
fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    for format in ["%Y-%m-%d", "%B %d, %Y", "%d %B %Y", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return Some(d);
        }
    }
    // Year-month and bare-year inputs resolve to the first of the period.
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{text}-01-01"), "%Y-%m-%d") {
        return Some(d);
    }
    None
}

/// Normalize any supported date representation to `YYYY-MM-DD`.
pub fn to_iso_date(value: DateLike<'_>) -> Option<String> {
    let date = match value {
        DateLike::Text(text) => parse_date_text(text)?,
        DateLike::Timestamp(seconds) => DateTime::from_timestamp(seconds, 0)?.date_naive(),
        DateLike::Date(date) => date,
        DateLike::DateTime(dt) => dt.date_naive(),
    };
    Some(date.format("%Y-%m-%d").to_string())
}

/// Normalize a UNIX timestamp (seconds) to a full ISO-8601 timestamp.
pub fn to_iso_datetime(seconds: i64) -> Option<String> {
    Some(
        DateTime::from_timestamp(seconds, 0)?
            .naive_utc()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string(),
    )
}

/// Decompose an ISO-8601 date string into `[year, month, day]`, stripping
/// trailing zero components: `"2020"` yields `[2020]`, not `[2020, 0, 0]`.
pub fn date_parts(iso8601: &str) -> Vec<i32> {
    // Incomplete dates are right-padded with zeros before slicing, so the
    // missing components drop out below.
    let mut padded = iso8601.to_string();
    while padded.len() < 10 {
        padded.push('0');
    }

    let component = |range: std::ops::Range<usize>| {
        padded
            .get(range)
            .and_then(|s| s.parse::<i32>().ok())
            .unwrap_or(0)
    };
    let year = component(0..4);
    let month = component(5..7);
    let day = component(8..10);

    let mut parts = vec![year, month, day];
    while parts.last() == Some(&0) {
        parts.pop();
    }
    parts
}

/// Reassemble an ISO-8601 date string from its parts, dropping all-zero
/// components: `(2020, 0, 0)` yields `"2020"`.
pub fn from_date_parts(year: i32, month: i32, day: i32) -> Option<String> {
    let components = [
        format!("{year:04}"),
        format!("{month:02}"),
        format!("{day:02}"),
    ];
    let kept: Vec<&str> = components
        .iter()
        .map(String::as_str)
        .filter(|c| !matches!(*c, "00" | "0000"))
        .collect();
    if kept.is_empty() {
        return None;
    }
    Some(kept.join("-"))
}

/// Three-letter lowercase month tag for a date in any supported form.
pub fn month_abbreviation(value: DateLike<'_>) -> Option<&'static str> {
    let iso = to_iso_date(value)?;
    let month = iso.split('-').nth(1)?.parse::<usize>().ok()?;
    MONTH_ABBREVIATIONS.get(month.checked_sub(1)?).copied()
}

/// Strip sub-second precision and redundant midnight times from an ISO-8601
/// timestamp; they interfere with downstream date-range parsing.
pub fn strip_milliseconds(iso8601: &str) -> String {
    if let Some((date, time)) = iso8601.split_once('T') {
        if time == "00:00:00" {
            return date.to_string();
        }
        if let Some((head, _)) = iso8601.split_once('+') {
            return format!("{head}Z");
        }
        if let Some((head, _)) = iso8601.split_once('.') {
            return format!("{head}Z");
        }
    }
    iso8601.to_string()
}
