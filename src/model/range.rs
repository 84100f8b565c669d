use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Column size used to partition the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Month,
    Quarter,
}

impl Granularity {
    /// Calendar months covered by one column.
    pub fn months(self) -> u32 {
        match self {
            Granularity::Month => 1,
            Granularity::Quarter => 3,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Granularity::Month => Granularity::Quarter,
            Granularity::Quarter => Granularity::Month,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Month => "Month",
            Granularity::Quarter => "Quarter",
        }
    }
}

/// The slice of calendar currently shown on the timeline.
///
/// `start` must strictly precede `end`; [`VisibleRange::new`] enforces this,
/// and every layout operation re-checks it since the fields are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VisibleRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LayoutError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// January 1st of `year` up to January 1st of the next year.
    pub fn year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
        Some(Self { start, end })
    }

    /// Smallest month-aligned range containing both dates.
    pub fn covering(first: NaiveDate, last: NaiveDate) -> Option<Self> {
        let (first, last) = if first <= last { (first, last) } else { (last, first) };
        let start = first_of_month(first);
        let end = first_of_month(last).checked_add_months(Months::new(1))?;
        Some(Self { start, end })
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.start < self.end {
            Ok(())
        } else {
            Err(LayoutError::InvalidRange {
                start: self.start,
                end: self.end,
            })
        }
    }

    /// Length of the range in days.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Pan by `steps` columns of the given granularity (negative pans back).
    pub fn shifted(&self, granularity: Granularity, steps: i32) -> Self {
        let months = Months::new(granularity.months() * steps.unsigned_abs());
        let shift = |date: NaiveDate| {
            if steps >= 0 {
                date.checked_add_months(months)
            } else {
                date.checked_sub_months(months)
            }
        };
        match (shift(self.start), shift(self.end)) {
            (Some(start), Some(end)) => Self { start, end },
            _ => *self,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Widen to whole calendar quarters: `start` moves back to the first day
    /// of its quarter and `end` forward to the next quarter boundary.
    pub fn quarter_aligned(&self) -> Self {
        let start = first_of_quarter(self.start);
        let mut end = first_of_quarter(self.end);
        if end < self.end {
            end = end.checked_add_months(Months::new(3)).unwrap_or(self.end);
        }
        Self { start, end }
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn first_of_quarter(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month0() / 3 * 3 + 1, 1).unwrap_or(date)
}
