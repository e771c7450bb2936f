//! Payroll month model.
//!
//! This module contains the [`PayMonth`] type, the calendar month a payroll
//! is computed for, expressed as the half-open window `[month_start, month_end)`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A validated calendar month.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayMonth;
/// use chrono::NaiveDate;
///
/// let period = PayMonth::new(2, 2024).unwrap();
/// assert_eq!(period.days_in_month(), 29);
/// assert!(period.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPayMonth")]
pub struct PayMonth {
    month: u32,
    year: i32,
    #[serde(skip)]
    start: NaiveDate,
    #[serde(skip)]
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawPayMonth {
    month: u32,
    year: i32,
}

impl TryFrom<RawPayMonth> for PayMonth {
    type Error = EngineError;

    fn try_from(raw: RawPayMonth) -> EngineResult<Self> {
        PayMonth::new(raw.month, raw.year)
    }
}

impl PayMonth {
    /// Creates a payroll month, rejecting months outside 1-12.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidPeriod { month, year };

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;

        Ok(Self {
            month,
            year,
            start,
            end,
        })
    }

    /// Returns the month containing `date`.
    pub fn of(date: NaiveDate) -> EngineResult<Self> {
        Self::new(date.month(), date.year())
    }

    /// The month number (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// First day of the month (inclusive).
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day of the following month (exclusive).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the month.
    pub fn days_in_month(&self) -> u32 {
        (self.end - self.start).num_days() as u32
    }

    /// Checks whether `date` falls inside `[start, end)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}
