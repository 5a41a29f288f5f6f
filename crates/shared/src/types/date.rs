//! Date parsing and inclusive date windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Formats accepted from bank statement exports, tried in order.
const STATEMENT_DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%d/%m/%Y", "%m-%d-%Y"];

/// Parses a ledger date. Only ISO `YYYY-MM-DD` is accepted.
pub fn parse_date(raw: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| InputError::MalformedDate(raw.to_string()))
}

/// Parses a bank statement date, trying each known export format.
///
/// Ambiguous dates such as `03/04/2025` resolve month-first.
#[must_use]
pub fn parse_statement_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    STATEMENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// An inclusive date window `[start, end]`.
///
/// Always satisfies `start <= end`; deserialization goes through the same
/// check as [`DateRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = InputError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Creates a window, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InputError> {
        if start > end {
            return Err(InputError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the window.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// The calendar year `year`.
    pub fn calendar_year(year: i32) -> Result<Self, InputError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| InputError::MalformedDate(format!("{year}-01-01")))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| InputError::MalformedDate(format!("{year}-12-31")))?;
        Ok(Self { start, end })
    }

    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
