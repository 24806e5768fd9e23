/// Date parsing utilities for path-based navigation
///
/// Pure conversions between human-friendly path segments ("today",
/// "aug/12", "2024/aug/12", "8/12/2024") and calendar dates, plus the
/// formatter and previous/next navigation helper used to build links.
/// Successfully parsed dates are rejected when they lie in the future.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use thiserror::Error;

/// Abbreviated month names, indexed by month number minus one
const MONTH_ABBREVS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Errors raised when a date path cannot be parsed
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DateParseError {
    #[error("Unknown date format: {0}")]
    UnknownFormat(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Cannot determine year in: {0}")]
    AmbiguousYear(String),

    #[error("Too many path segments: {0}")]
    TooManySegments(String),

    #[error("Cannot navigate to future date: {parsed} (today is {today})")]
    FutureDate { parsed: NaiveDate, today: NaiveDate },
}

/// Parse a date from path segments
///
/// Supported formats:
/// - "" or "today"      -> today's date
/// - "aug/12" or "8/12" -> month/day in the current year
/// - "2024/aug/12"      -> year/month/day
/// - "aug/12/2024"      -> month/day/year
///
/// A segment is treated as a year iff it parses as an integer in
/// [2000, 2100]. Months accept a 1-12 number or a case-insensitive
/// name/abbreviation (including the irregular "sept").
pub fn parse_date_path(date_path: &str) -> Result<NaiveDate, DateParseError> {
    if date_path.is_empty() || date_path == "today" {
        return Ok(today());
    }

    let parts: Vec<String> = date_path
        .trim_matches('/')
        .split('/')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        return Ok(today());
    }

    let joined = parts.join("/");
    let (year, month, day) = match parts.as_slice() {
        [part] => {
            if part == "today" {
                return Ok(today());
            }
            return Err(DateParseError::UnknownFormat(part.clone()));
        }
        [month_part, day_part] => (
            today().year(),
            parse_month(month_part)?,
            parse_day(day_part, &joined)?,
        ),
        [first, second, third] => {
            if let Some(year) = as_year(first) {
                (year, parse_month(second)?, parse_day(third, &joined)?)
            } else if let Some(year) = as_year(third) {
                (year, parse_month(first)?, parse_day(second, &joined)?)
            } else {
                return Err(DateParseError::AmbiguousYear(joined));
            }
        }
        _ => return Err(DateParseError::TooManySegments(joined)),
    };

    let parsed = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DateParseError::InvalidDate(joined))?;
    validate_not_future(parsed)?;
    Ok(parsed)
}

/// Format a date for use in paths
///
/// Today renders as "today"; other dates as "{abbrev-month}/{day}", with
/// "/{year}" appended only when the year differs from the current year.
pub fn format_date_path(date: NaiveDate) -> String {
    let now = today();
    if date == now {
        return "today".to_string();
    }

    let month_name = MONTH_ABBREVS[date.month0() as usize];
    if date.year() == now.year() {
        format!("{}/{}", month_name, date.day())
    } else {
        format!("{}/{}/{}", month_name, date.day(), date.year())
    }
}

/// Previous/next dates and paths for navigating around a date
#[derive(Debug, Clone, PartialEq)]
pub struct DateNavigation {
    pub prev_date: NaiveDate,
    /// The next calendar day; None when it would be in the future
    pub next_date: Option<NaiveDate>,
    pub prev_path: String,
    pub next_path: Option<String>,
    pub today_path: &'static str,
    pub is_today: bool,
    pub is_future: bool,
    pub can_go_next: bool,
}

/// Compute the navigation neighbors for a date
pub fn navigation_for(date: NaiveDate) -> DateNavigation {
    let now = today();
    let prev_date = date - Duration::days(1);
    let next_date = date + Duration::days(1);
    let can_go_next = next_date <= now;

    DateNavigation {
        prev_date,
        next_date: can_go_next.then_some(next_date),
        prev_path: format_date_path(prev_date),
        next_path: can_go_next.then(|| format_date_path(next_date)),
        today_path: "today",
        is_today: date == now,
        is_future: date > now,
        can_go_next,
    }
}

fn today() -> NaiveDate {
    Utc::now().naive_utc().date()
}

/// Parse a month segment as a name or a 1-12 number
fn parse_month(month_str: &str) -> Result<u32, DateParseError> {
    let month = match month_str {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => match month_str.parse::<u32>() {
            Ok(n) if (1..=12).contains(&n) => n,
            _ => return Err(DateParseError::InvalidMonth(month_str.to_string())),
        },
    };
    Ok(month)
}

fn parse_day(day_str: &str, joined: &str) -> Result<u32, DateParseError> {
    day_str
        .parse::<u32>()
        .map_err(|_| DateParseError::InvalidDate(joined.to_string()))
}

/// A segment is year-shaped iff it is an integer in [2000, 2100]
fn as_year(year_str: &str) -> Option<i32> {
    year_str
        .parse::<i32>()
        .ok()
        .filter(|y| (2000..=2100).contains(y))
}

fn validate_not_future(parsed: NaiveDate) -> Result<(), DateParseError> {
    let now = today();
    if parsed > now {
        return Err(DateParseError::FutureDate { parsed, today: now });
    }
    Ok(())
}
