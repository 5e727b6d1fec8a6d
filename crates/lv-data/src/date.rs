//! Logbook date parsing
//!
//! The canonical format is `DD.MM.YYYY`. It is split into fields directly so
//! day and month can never be transposed. Other inputs get a best-effort,
//! locale-independent fallback: ISO `YYYY-MM-DD`, then RFC 3339 timestamps.
//! Anything else becomes [`LogDate::INVALID`], which orders before every
//! valid date.

use std::fmt;
use chrono::{DateTime, Datelike, NaiveDate};

/// A parsed logbook date, or the invalid-date sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LogDate(Option<NaiveDate>);

impl LogDate {
    /// Sentinel for unparsable input
    pub const INVALID: LogDate = LogDate(None);

    /// Parse a date string. Never fails; unparsable input yields [`LogDate::INVALID`].
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some(fields) = split_dotted(input) {
            // Matching the canonical pattern is final: 31.02.2023 is invalid, not reinterpreted.
            return Self(NaiveDate::from_ymd_opt(fields.2, fields.1, fields.0));
        }
        Self(parse_fallback(input))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        Self(NaiveDate::from_ymd_opt(year, month, day))
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.0
    }

    pub fn year(&self) -> Option<i32> {
        self.0.map(|d| d.year())
    }

    /// Month, 1-12
    pub fn month(&self) -> Option<u32> {
        self.0.map(|d| d.month())
    }
}

impl fmt::Display for LogDate {
    /// `DD.MM.YYYY`; the invalid sentinel renders as empty text
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.format("%d.%m.%Y")),
            None => Ok(()),
        }
    }
}

/// `(day, month, year)` when `input` has the shape `D{1,2}.M{1,2}.YYYY`
fn split_dotted(input: &str) -> Option<(u32, u32, i32)> {
    let mut parts = input.split('.');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let digits = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !(digits(day, 1, 2) && digits(month, 1, 2) && digits(year, 4, 4)) {
        return None;
    }

    Some((day.parse().ok()?, month.parse().ok()?, year.parse().ok()?))
}

fn parse_fallback(input: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.date_naive())
}
