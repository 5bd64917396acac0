use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::{ClientError, ClientResult};

/// Datetime shapes tried after the ISO forms. Month-first wins for ambiguous
/// slash dates, matching how spreadsheet exports write them.
const FALLBACK_DATETIME_FORMATS: [&str; 6] = [
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

const FALLBACK_DATE_FORMATS: [&str; 16] = [
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%m/%d/%y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d-%b-%Y",
    "%A, %B %d, %Y",
    "%Y%m%d",
];

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a table cell as a calendar date: ISO forms first, then the general
/// fallback shapes. Returns `None` when neither recognizes the value.
pub fn parse_table_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_primary(trimmed).or_else(|| parse_fallback(trimmed))
}

pub fn parse_iso_date_strict(value: &str, field_name: &str, command: &str) -> ClientResult<NaiveDate> {
    if !looks_like_iso_date(value) {
        return Err(ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with a real calendar date."),
            Some(command),
        ));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with valid calendar values."),
            Some(command),
        )
    })
}

pub fn parse_optional_iso_date(
    value: Option<&str>,
    field_name: &str,
    command: &str,
) -> ClientResult<Option<NaiveDate>> {
    match value {
        Some(raw) => parse_iso_date_strict(raw, field_name, command).map(Some),
        None => Ok(None),
    }
}

/// Inclusive `[from, to]` period; rejects reversed bounds.
pub fn build_period(from: &str, to: &str, command: &str) -> ClientResult<(NaiveDate, NaiveDate)> {
    let start = parse_iso_date_strict(from, "from", command)?;
    let end = parse_iso_date_strict(to, "to", command)?;
    if start > end {
        return Err(ClientError::invalid_argument_for_command(
            "Invalid date range: `from` must be on or before `to`.",
            Some(command),
        ));
    }
    Ok((start, end))
}

/// `length` consecutive dates from `start`; stops early at the calendar maximum.
pub fn consecutive_dates(start: NaiveDate, length: u32) -> Vec<NaiveDate> {
    let remaining = (NaiveDate::MAX - start).num_days().saturating_add(1);
    let capacity = usize::try_from(remaining.min(i64::from(length))).unwrap_or(0);
    let mut dates = Vec::with_capacity(capacity);
    let mut current = Some(start);
    for _ in 0..length {
        let Some(date) = current else {
            break;
        };
        dates.push(date);
        current = date.succ_opt();
    }
    dates
}

/// Number of calendar days in the inclusive range, at least 1.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> u32 {
    let span = (end - start).num_days().max(0) + 1;
    u32::try_from(span).unwrap_or(u32::MAX)
}

pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

fn parse_primary(value: &str) -> Option<NaiveDate> {
    if looks_like_iso_date(value) {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d").ok();
    }

    // ISO datetime: date prefix followed by `T` or a space.
    if value.len() > 10 && value.is_char_boundary(10) {
        let (prefix, rest) = value.split_at(10);
        if looks_like_iso_date(prefix) && (rest.starts_with('T') || rest.starts_with(' ')) {
            return NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok();
        }
    }

    None
}

fn parse_fallback(value: &str) -> Option<NaiveDate> {
    for format in FALLBACK_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.date());
        }
    }
    for format in FALLBACK_DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    None
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}
