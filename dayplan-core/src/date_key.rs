//! Calendar date and month keys.
//!
//! A `DateKey` is the sortable `YYYY-MM-DD` text used both as the store key
//! and as the `date` field embedded in each stored day.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, Months, NaiveDate};

use crate::error::{PlanError, PlanResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    pub fn today() -> Self {
        DateKey(Local::now().date_naive())
    }

    /// Parse `YYYY-MM-DD`. Anything else (including `2024-6-1`) is rejected
    /// so that keys stay sortable as text.
    pub fn parse(s: &str) -> PlanResult<Self> {
        let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map_err(|_| PlanError::InvalidDate(s.to_string()))?;

        // chrono accepts unpadded fields; the canonical form must round-trip.
        if date.format(DATE_FORMAT).to_string() != s {
            return Err(PlanError::InvalidDate(s.to_string()));
        }

        Ok(DateKey(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn month(&self) -> MonthKey {
        MonthKey {
            year: self.0.year(),
            month: self.0.month(),
        }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateKey::parse(s)
    }
}

/// A calendar month, used to page through plans the way a month grid does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> PlanResult<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(PlanError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        Ok(MonthKey { year, month })
    }

    pub fn current() -> Self {
        DateKey::today().month()
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> PlanResult<Self> {
        let invalid = || PlanError::InvalidMonth(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        MonthKey::new(year, month).map_err(|_| invalid())
    }

    pub fn first_day(&self) -> DateKey {
        // Validated in the constructors.
        DateKey(NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default())
    }

    pub fn next(&self) -> MonthKey {
        self.shift(1)
    }

    pub fn prev(&self) -> MonthKey {
        self.shift(-1)
    }

    fn shift(&self, delta: i32) -> MonthKey {
        let first = self.first_day().date();
        let shifted = if delta >= 0 {
            first.checked_add_months(Months::new(delta as u32))
        } else {
            first.checked_sub_months(Months::new(delta.unsigned_abs()))
        };

        shifted.map(|d| DateKey(d).month()).unwrap_or(*self)
    }

    pub fn contains(&self, date: &DateKey) -> bool {
        date.0.year() == self.year && date.0.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonthKey::parse(s)
    }
}
