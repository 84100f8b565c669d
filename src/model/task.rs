use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::project::ProjectId;

/// Effort assumed for a task that carries no explicit ETP value.
pub const DEFAULT_ETP: f64 = 1.0;

/// Backend-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single bar on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    /// Display text shown on the bar.
    pub text: String,
    /// Free-form annotation shown in the tooltip.
    #[serde(default)]
    pub comment: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Full-time-equivalent effort allocated to this task.
    #[serde(default)]
    pub etp: Option<f64>,
    /// Color tag such as `blue-600`.
    #[serde(default)]
    pub color: Option<String>,
}

impl Task {
    pub fn new(
        id: TaskId,
        project_id: ProjectId,
        text: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id,
            project_id,
            text: text.into(),
            comment: None,
            start,
            end,
            etp: None,
            color: None,
        }
    }

    pub fn effort(&self) -> f64 {
        self.etp.unwrap_or(DEFAULT_ETP)
    }

    /// Tooltip line, e.g. `01/03/2025 - 01/05/2025`.
    pub fn dates_label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }

    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
