//! Per-period effort (ETP) sheet: one row per project, one column per period.
//!
//! A cell starts out as the largest effort among the project's tasks active
//! in that period; an explicit [`EtpEntry`] replaces it. Row totals are the
//! row maximum, period totals the column sum, and the grand total the sum of
//! row totals.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::layout::{Span, TimeAxis};
use crate::model::{Project, ProjectId, Task, Workspace};

/// Parse an effort value typed by the user. Empty input is rejected.
pub fn parse_etp(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    match trimmed.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ValidationError::InvalidEtp(trimmed.to_string())),
    }
}

pub fn format_etp(value: f64) -> String {
    format!("{:.2}", value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Period {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Whether `task` runs during this period. A zero-length task counts for
    /// the period containing its date.
    fn covers(&self, task: &Task) -> bool {
        if task.start == task.end {
            return self.start <= task.start && task.start < self.end;
        }
        Span::new(task.start, task.end).overlaps(&Span::new(self.start, self.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtpCell {
    pub value: f64,
    /// Set when the value comes from an explicit entry rather than tasks.
    pub overridden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EtpRow {
    pub project_id: ProjectId,
    pub name: String,
    pub cells: Vec<EtpCell>,
}

impl EtpRow {
    pub fn total(&self) -> f64 {
        self.cells.iter().map(|c| c.value).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EtpSheet {
    pub periods: Vec<Period>,
    pub rows: Vec<EtpRow>,
}

impl EtpSheet {
    pub fn build(workspace: &Workspace, axis: &TimeAxis) -> Self {
        let periods: Vec<Period> = (0..axis.len())
            .filter_map(|i| {
                let (start, end) = axis.column_bounds(i)?;
                Some(Period {
                    label: axis.columns[i].label.clone(),
                    start,
                    end,
                })
            })
            .collect();

        let rows = workspace
            .projects
            .iter()
            .map(|project| build_row(project, &periods, workspace))
            .collect();

        Self { periods, rows }
    }

    pub fn period_index(&self, label: &str) -> Option<usize> {
        self.periods.iter().position(|p| p.label == label)
    }

    pub fn row_index(&self, project_id: ProjectId) -> Option<usize> {
        self.rows.iter().position(|r| r.project_id == project_id)
    }

    pub fn cell(&self, project_id: ProjectId, period: &str) -> Option<&EtpCell> {
        let row = self.row_index(project_id)?;
        let col = self.period_index(period)?;
        self.rows[row].cells.get(col)
    }

    pub fn period_total(&self, period: usize) -> f64 {
        self.rows
            .iter()
            .filter_map(|r| r.cells.get(period))
            .map(|c| c.value)
            .sum()
    }

    pub fn grand_total(&self) -> f64 {
        self.rows.iter().map(EtpRow::total).sum()
    }

    /// Validate `raw` and store it in the cell. Totals follow automatically.
    pub fn set_cell(
        &mut self,
        project_id: ProjectId,
        period: &str,
        raw: &str,
    ) -> Result<f64, ValidationError> {
        let value = parse_etp(raw)?;
        let unknown = || ValidationError::UnknownCell {
            project: project_id.to_string(),
            period: period.to_string(),
        };
        let row = self.row_index(project_id).ok_or_else(unknown)?;
        let col = self.period_index(period).ok_or_else(unknown)?;
        self.rows[row].cells[col] = EtpCell {
            value,
            overridden: true,
        };
        Ok(value)
    }
}

fn build_row(project: &Project, periods: &[Period], workspace: &Workspace) -> EtpRow {
    let cells = periods
        .iter()
        .map(|period| match workspace.etp_entry(project.id, &period.label) {
            Some(entry) => EtpCell {
                value: entry.etp_value,
                overridden: true,
            },
            None => EtpCell {
                value: project
                    .tasks
                    .iter()
                    .filter(|t| period.covers(t))
                    .map(Task::effort)
                    .fold(0.0, f64::max),
                overridden: false,
            },
        })
        .collect();

    EtpRow {
        project_id: project.id,
        name: project.name.clone(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EtpEntry, Granularity, TaskId, VisibleRange};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn workspace() -> Workspace {
        let mut procurement = Project::new(ProjectId(1), "Procurement");
        let mut contracts = Task::new(TaskId(1), ProjectId(1), "Contracts", d(2025, 3, 1), d(2025, 5, 1));
        contracts.etp = Some(1.0);
        let mut rfp = Task::new(TaskId(2), ProjectId(1), "RFP", d(2025, 5, 1), d(2025, 9, 1));
        rfp.etp = Some(3.0);
        procurement.tasks = vec![contracts, rfp];

        let mut events = Project::new(ProjectId(2), "Events");
        let mut design = Task::new(TaskId(3), ProjectId(2), "Design", d(2025, 1, 15), d(2025, 2, 1));
        design.etp = Some(0.5);
        events.tasks = vec![design];

        Workspace {
            projects: vec![procurement, events],
            etp_entries: Vec::new(),
        }
    }

    fn axis() -> TimeAxis {
        TimeAxis::build(&VisibleRange::year(2025).unwrap(), Granularity::Quarter).unwrap()
    }

    fn values(sheet: &EtpSheet, row: usize) -> Vec<f64> {
        sheet.rows[row].cells.iter().map(|c| c.value).collect()
    }

    #[test]
    fn cells_take_the_largest_active_effort() {
        let sheet = EtpSheet::build(&workspace(), &axis());
        assert_eq!(sheet.periods.len(), 4);
        assert_eq!(values(&sheet, 0), [1.0, 3.0, 3.0, 0.0]);
        assert_eq!(values(&sheet, 1), [0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn totals_are_row_max_column_sum_and_sum_of_maxima() {
        let sheet = EtpSheet::build(&workspace(), &axis());
        assert_eq!(sheet.rows[0].total(), 3.0);
        assert_eq!(sheet.rows[1].total(), 0.5);
        assert_eq!(sheet.period_total(0), 1.5);
        assert_eq!(sheet.period_total(1), 3.0);
        assert_eq!(sheet.period_total(3), 0.0);
        assert_eq!(sheet.grand_total(), 3.5);
    }

    #[test]
    fn explicit_entries_override_derived_values() {
        let mut ws = workspace();
        ws.etp_entries.push(EtpEntry {
            project_id: ProjectId(2),
            period: "Q4 2025".into(),
            etp_value: 2.25,
        });
        let sheet = EtpSheet::build(&ws, &axis());
        let cell = sheet.cell(ProjectId(2), "Q4 2025").unwrap();
        assert_eq!(cell.value, 2.25);
        assert!(cell.overridden);
        assert_eq!(sheet.rows[1].total(), 2.25);
    }

    #[test]
    fn editing_a_cell_updates_the_totals() {
        let mut sheet = EtpSheet::build(&workspace(), &axis());
        assert_eq!(sheet.set_cell(ProjectId(1), "Q4 2025", "4.5"), Ok(4.5));
        assert_eq!(sheet.rows[0].total(), 4.5);
        assert_eq!(sheet.period_total(3), 4.5);
        assert_eq!(sheet.grand_total(), 5.0);
    }

    #[test]
    fn invalid_edits_leave_the_sheet_alone() {
        let mut sheet = EtpSheet::build(&workspace(), &axis());
        let before = sheet.clone();
        assert_eq!(
            sheet.set_cell(ProjectId(1), "Q1 2025", "-1"),
            Err(ValidationError::InvalidEtp("-1".into()))
        );
        assert!(sheet.set_cell(ProjectId(1), "Q1 2025", "abc").is_err());
        assert!(matches!(
            sheet.set_cell(ProjectId(9), "Q1 2025", "1"),
            Err(ValidationError::UnknownCell { .. })
        ));
        assert!(matches!(
            sheet.set_cell(ProjectId(1), "Q1 2030", "1"),
            Err(ValidationError::UnknownCell { .. })
        ));
        assert_eq!(sheet, before);
    }

    #[test]
    fn parse_accepts_decimal_commas_and_rejects_garbage() {
        assert_eq!(parse_etp(" 0,5 "), Ok(0.5));
        assert_eq!(parse_etp("2"), Ok(2.0));
        assert!(parse_etp("").is_err());
        assert!(parse_etp("inf").is_err());
        assert!(parse_etp("NaN").is_err());
        assert_eq!(format_etp(1.0 / 3.0), "0.33");
    }
}
