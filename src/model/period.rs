//! Calendar periods used for reports, and the inclusive date range they resolve to.

use anyhow::Context;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An inclusive range of calendar days. Both `start` and `end` are part of the range.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range from `start` to `end`. A `start` later than `end` is allowed and results
    /// in a range containing no days.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls on or after `start` and on or before `end`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// The reporting periods offered by `ledger report`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    /// From the first day of the current month through today.
    MonthToDate,
    /// The whole of the month before the current one.
    PreviousMonth,
    /// From January 1st of the current year through today.
    YearToDate,
    /// The whole of the year before the current one.
    PreviousYear,
}

serde_plain::derive_display_from_serialize!(Period);
serde_plain::derive_fromstr_from_deserialize!(Period);

impl Period {
    /// Resolves the period relative to `today`.
    pub fn range(&self, today: NaiveDate) -> crate::Result<DateRange> {
        let range = match self {
            Period::MonthToDate => DateRange::new(first_of_month(today)?, today),
            Period::PreviousMonth => {
                let start = first_of_month(today)?
                    .checked_sub_months(Months::new(1))
                    .with_context(|| format!("No month precedes {today}"))?;
                let end = first_of_month(today)?
                    .pred_opt()
                    .with_context(|| format!("No day precedes the month of {today}"))?;
                DateRange::new(start, end)
            }
            Period::YearToDate => DateRange::new(first_of_year(today.year())?, today),
            Period::PreviousYear => {
                let year = today.year() - 1;
                DateRange::new(first_of_year(year)?, last_of_year(year)?)
            }
        };
        Ok(range)
    }

    /// A human readable title for report output.
    pub fn title(&self) -> &'static str {
        match self {
            Period::MonthToDate => "Month to date report",
            Period::PreviousMonth => "Previous month's report",
            Period::YearToDate => "Year to date report",
            Period::PreviousYear => "Previous year report",
        }
    }
}

fn first_of_month(date: NaiveDate) -> crate::Result<NaiveDate> {
    date.with_day(1)
        .with_context(|| format!("Unable to find the first day of the month of {date}"))
}

fn first_of_year(year: i32) -> crate::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1).with_context(|| format!("Year {year} is out of range"))
}

fn last_of_year(year: i32) -> crate::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31).with_context(|| format!("Year {year} is out of range"))
}
