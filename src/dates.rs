//! Date ranges and their day-by-day expansion.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::{GaError, Result};

/// Wire format of every date exchanged with the reporting API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar days, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    #[serde(rename = "startDate")]
    start: NaiveDate,
    #[serde(rename = "endDate")]
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(GaError::InvalidArgument(format!(
                "start date {} is after end date {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends included.
    pub fn num_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Every day of the range, from `end` back to `start`.
    ///
    /// The descending order is part of the contract: day-by-day fetches
    /// return their batches newest first.
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..self.num_days() as i64)
            .map(|offset| self.end - Duration::days(offset))
            .collect()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} and {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Parse one `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        GaError::InvalidArgument(format!("'{}' is not a YYYY-MM-DD date: {}", raw, e))
    })?;
    // chrono tolerates surrounding whitespace and unpadded fields
    if date.format(DATE_FORMAT).to_string() != raw {
        return Err(GaError::InvalidArgument(format!(
            "'{}' is not a YYYY-MM-DD date",
            raw
        )));
    }
    Ok(date)
}

/// Expand two `YYYY-MM-DD` strings into every day between them, descending.
pub fn expand_days(start: &str, end: &str) -> Result<Vec<String>> {
    let range = DateRange::parse(start, end)?;
    Ok(range
        .days()
        .into_iter()
        .map(|day| day.format(DATE_FORMAT).to_string())
        .collect())
}
