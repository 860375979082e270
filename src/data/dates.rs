use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::model::CellValue;

// ---------------------------------------------------------------------------
// Date parsing policies
// ---------------------------------------------------------------------------

/// How a date field is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePolicy {
    /// Exactly one chrono format, e.g. `"%d/%m/%Y"`.
    Strict(&'static str),
    /// Best effort over [`TOLERANT_DATETIME_FORMATS`] and [`TOLERANT_DATE_FORMATS`].
    Tolerant,
}

/// Timestamps are truncated to their date. Tried first.
const TOLERANT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Ambiguous slash dates are read month-first, then day-first.
const TOLERANT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%d-%b-%y",
];

/// Outcome of coercing one date cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedDate {
    Valid(NaiveDate),
    Missing,
    Invalid(String),
}

impl From<ParsedDate> for CellValue {
    fn from(parsed: ParsedDate) -> Self {
        match parsed {
            ParsedDate::Valid(d) => CellValue::Date(d),
            ParsedDate::Missing => CellValue::Null,
            ParsedDate::Invalid(raw) => CellValue::InvalidDate(raw),
        }
    }
}

impl DatePolicy {
    /// Parse a trimmed, non-empty string.
    pub fn parse_str(self, s: &str) -> Option<NaiveDate> {
        match self {
            DatePolicy::Strict(fmt) => parse_with(s, fmt),
            DatePolicy::Tolerant => parse_tolerant(s),
        }
    }

    /// Coerce a raw cell. Never fails: unparseable text becomes
    /// [`ParsedDate::Invalid`], blanks become [`ParsedDate::Missing`].
    pub fn coerce(self, value: &CellValue) -> ParsedDate {
        let raw = match value {
            CellValue::Null => return ParsedDate::Missing,
            CellValue::Date(d) => return ParsedDate::Valid(*d),
            CellValue::Text(s) | CellValue::InvalidDate(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if raw.is_empty() {
            return ParsedDate::Missing;
        }
        match self.parse_str(&raw) {
            Some(d) => ParsedDate::Valid(d),
            None => ParsedDate::Invalid(raw),
        }
    }
}

/// Years a spreadsheet date cell can hold. Also rejects chrono's reading of
/// `"24"` as year 24 under `%Y`.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=9999;

fn plausible(d: NaiveDate) -> Option<NaiveDate> {
    YEAR_RANGE.contains(&d.year()).then_some(d)
}

fn parse_with(s: &str, fmt: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, fmt).ok().and_then(plausible)
}

fn parse_tolerant(s: &str) -> Option<NaiveDate> {
    TOLERANT_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDateTime::parse_from_str(s, fmt)
                .ok()
                .map(|dt| dt.date())
                .and_then(plausible)
        })
        .or_else(|| TOLERANT_DATE_FORMATS.iter().find_map(|fmt| parse_with(s, fmt)))
}
