//! Timeline layout: calendar columns, normalized bar positions and lanes.
//!
//! Everything here is a pure function of its arguments. Callers hand in a
//! materialized task list and range and get fresh layout values back.

pub mod axis;
pub mod geometry;
pub mod lanes;

pub use axis::{column_label, normalize, partition, ColumnDescriptor, TimeAxis};
pub use geometry::Span;
pub use lanes::{pack, pack_tasks, LaneAssignment};

use crate::error::LayoutError;
use crate::model::{Task, TaskId, VisibleRange};

/// Where one task bar goes inside its project row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskPlacement {
    pub id: TaskId,
    /// Left edge as a fraction of the visible range.
    pub left: f64,
    /// Width as a fraction of the visible range.
    pub width: f64,
    pub lane: usize,
}

impl TaskPlacement {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Layout of one project row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowLayout {
    /// One placement per task, in the order the tasks were given.
    pub placements: Vec<TaskPlacement>,
    pub lane_count: usize,
}

impl RowLayout {
    pub fn placement(&self, id: TaskId) -> Option<&TaskPlacement> {
        self.placements.iter().find(|p| p.id == id)
    }
}

/// Normalize every task against `range` and pack the row on those positions.
pub fn layout_row(tasks: &[Task], range: &VisibleRange) -> Result<RowLayout, LayoutError> {
    range.validate()?;

    let spans: Vec<(TaskId, Span<f64>)> = tasks
        .iter()
        .map(|t| (t.id, Span::new(normalize(t.start, range), normalize(t.end, range))))
        .collect();
    let assignment = pack(&spans)?;

    let placements = spans
        .iter()
        .zip(assignment.lanes())
        .map(|((id, span), &lane)| TaskPlacement {
            id: *id,
            left: span.start,
            width: span.end - span.start,
            lane,
        })
        .collect();

    Ok(RowLayout {
        placements,
        lane_count: assignment.lane_count(),
    })
}
