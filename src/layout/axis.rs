//! Calendar partitioning of the visible range into grid columns.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::LayoutError;
use crate::model::{Granularity, VisibleRange};

/// One grid column: where it starts and what the header shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub start: NaiveDate,
    pub label: String,
}

impl ColumnDescriptor {
    fn new(start: NaiveDate, granularity: Granularity) -> Self {
        Self {
            start,
            label: column_label(start, granularity),
        }
    }
}

/// Header text for a column starting at `date`: `Jan 25` or `Q1 2025`.
pub fn column_label(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Month => date.format("%b %y").to_string(),
        Granularity::Quarter => format!("Q{} {}", date.month0() / 3 + 1, date.year()),
    }
}

/// Split `range` into month or quarter columns starting at `range.start`.
pub fn partition(
    range: &VisibleRange,
    granularity: Granularity,
) -> Result<Vec<ColumnDescriptor>, LayoutError> {
    TimeAxis::build(range, granularity).map(|axis| axis.columns)
}

/// Position of `instant` as a fraction of `range`, measured in days.
///
/// Not clamped: instants before the range map below 0 and instants after it
/// above 1, so partially visible bars extend off the grid. `range` must be
/// valid; an empty range divides by zero.
pub fn normalize(instant: NaiveDate, range: &VisibleRange) -> f64 {
    let elapsed = (instant - range.start).num_days() as f64;
    elapsed / range.days() as f64
}

/// The partitioned axis together with the closing boundary of its last
/// column.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    pub range: VisibleRange,
    pub granularity: Granularity,
    pub columns: Vec<ColumnDescriptor>,
    /// Boundary one step after the last column start; always `>= range.end`.
    pub span_end: NaiveDate,
}

impl TimeAxis {
    pub fn build(range: &VisibleRange, granularity: Granularity) -> Result<Self, LayoutError> {
        range.validate()?;

        let mut columns = Vec::new();
        let mut steps = 0u32;
        let mut current = range.start;
        while current < range.end {
            columns.push(ColumnDescriptor::new(current, granularity));
            steps += 1;
            current = boundary(range.start, granularity, steps);
        }

        Ok(Self {
            range: *range,
            granularity,
            columns,
            span_end: current,
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `[start, end)` of column `index`; the last column ends at `span_end`.
    pub fn column_bounds(&self, index: usize) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.columns.get(index)?.start;
        let end = self
            .columns
            .get(index + 1)
            .map(|c| c.start)
            .unwrap_or(self.span_end);
        Some((start, end))
    }

    pub fn position(&self, instant: NaiveDate) -> f64 {
        normalize(instant, &self.range)
    }
}

/// The `steps`-th boundary counted from `origin`.
///
/// Offsets are always taken from the origin so a start on the 31st clamps to
/// shorter months without drifting earlier on later steps.
fn boundary(origin: NaiveDate, granularity: Granularity, steps: u32) -> NaiveDate {
    granularity
        .months()
        .checked_mul(steps)
        .and_then(|months| origin.checked_add_months(Months::new(months)))
        .unwrap_or(NaiveDate::MAX)
}
