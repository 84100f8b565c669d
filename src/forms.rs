//! Project and task dialog state, validated into backend drafts.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ValidationError;
use crate::etp::parse_etp;
use crate::model::project::DEFAULT_COLOR_SCHEME;
use crate::model::task::DEFAULT_ETP;
use crate::model::{Project, ProjectId, Task, TaskId};

/// Color schemes offered in the project dialog.
pub const COLOR_SCHEMES: &[&str] = &[
    "blue", "purple", "green", "yellow", "red", "indigo", "teal", "gray",
];

/// Validated project fields, ready to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    pub color_scheme: String,
}

/// Validated task fields, ready to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    pub project_id: ProjectId,
    pub text: String,
    pub comment: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub etp: f64,
    /// Explicit bar color; the backend picks one from the project when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Contents of the project dialog. `id` is set when editing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub id: Option<ProjectId>,
    pub name: String,
    pub color_scheme: String,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
        }
    }
}

impl ProjectForm {
    pub fn from_project(project: &Project) -> Self {
        Self {
            id: Some(project.id),
            name: project.name.clone(),
            color_scheme: project.color_scheme.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn validate(&self) -> Result<ProjectDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required("project name"));
        }
        let scheme = self.color_scheme.trim();
        Ok(ProjectDraft {
            name: name.to_string(),
            color_scheme: if scheme.is_empty() {
                DEFAULT_COLOR_SCHEME.to_string()
            } else {
                scheme.to_string()
            },
        })
    }
}

/// Contents of the task dialog. `id` is set when editing.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub id: Option<TaskId>,
    pub project_id: Option<ProjectId>,
    pub text: String,
    pub comment: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Raw text of the ETP field.
    pub etp: String,
}

impl TaskForm {
    /// Blank form starting on `today` and lasting one week.
    pub fn new(today: NaiveDate, project_id: Option<ProjectId>) -> Self {
        Self {
            id: None,
            project_id,
            text: String::new(),
            comment: String::new(),
            start: today,
            end: today + chrono::Duration::days(7),
            etp: DEFAULT_ETP.to_string(),
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            project_id: Some(task.project_id),
            text: task.text.clone(),
            comment: task.comment.clone().unwrap_or_default(),
            start: task.start,
            end: task.end,
            etp: task.effort().to_string(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Move the start date; the end date never stays before it.
    pub fn set_start(&mut self, start: NaiveDate) {
        self.start = start;
        if self.end < start {
            self.end = start;
        }
    }

    pub fn validate(&self) -> Result<TaskDraft, ValidationError> {
        let project_id = self.project_id.ok_or(ValidationError::Required("project"))?;
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ValidationError::Required("task text"));
        }
        if self.end < self.start {
            return Err(ValidationError::EndBeforeStart {
                start: self.start,
                end: self.end,
            });
        }
        let etp = if self.etp.trim().is_empty() {
            DEFAULT_ETP
        } else {
            parse_etp(&self.etp)?
        };
        let comment = self.comment.trim();

        Ok(TaskDraft {
            project_id,
            text: text.to_string(),
            comment: (!comment.is_empty()).then(|| comment.to_string()),
            start_date: self.start,
            end_date: self.end,
            etp,
            color: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn project_name_is_required_and_trimmed() {
        let mut form = ProjectForm::default();
        form.name = "   ".into();
        assert_eq!(form.validate(), Err(ValidationError::Required("project name")));

        form.name = "  Observability ".into();
        form.color_scheme = String::new();
        let draft = form.validate().unwrap();
        assert_eq!(draft.name, "Observability");
        assert_eq!(draft.color_scheme, "blue");
    }

    #[test]
    fn task_requires_project_and_text() {
        let mut form = TaskForm::new(d(3, 1), None);
        form.text = "Audit".into();
        assert_eq!(form.validate(), Err(ValidationError::Required("project")));

        form.project_id = Some(ProjectId(4));
        form.text = " ".into();
        assert_eq!(form.validate(), Err(ValidationError::Required("task text")));
    }

    #[test]
    fn task_end_may_not_precede_start() {
        let mut form = TaskForm::new(d(3, 1), Some(ProjectId(1)));
        form.text = "Audit".into();
        form.end = d(2, 1);
        assert_eq!(
            form.validate(),
            Err(ValidationError::EndBeforeStart {
                start: d(3, 1),
                end: d(2, 1)
            })
        );
    }

    #[test]
    fn moving_start_past_end_drags_the_end_along() {
        let mut form = TaskForm::new(d(3, 1), Some(ProjectId(1)));
        form.set_start(d(4, 1));
        assert_eq!(form.end, d(4, 1));
        form.set_start(d(3, 15));
        assert_eq!(form.end, d(4, 1));
    }

    #[test]
    fn task_draft_defaults_and_parses_etp() {
        let mut form = TaskForm::new(d(3, 1), Some(ProjectId(1)));
        form.text = "Pilot".into();
        form.etp = String::new();
        assert_eq!(form.validate().unwrap().etp, 1.0);

        form.etp = "2.5".into();
        form.comment = "  ".into();
        let draft = form.validate().unwrap();
        assert_eq!(draft.etp, 2.5);
        assert_eq!(draft.comment, None);

        form.etp = "lots".into();
        assert!(matches!(form.validate(), Err(ValidationError::InvalidEtp(_))));
    }

    #[test]
    fn edit_form_round_trips_a_task() {
        let mut task = Task::new(TaskId(9), ProjectId(2), "RFP", d(5, 1), d(9, 1));
        task.comment = Some("3 ETP during negotiations".into());
        task.etp = Some(3.0);
        let form = TaskForm::from_task(&task);
        assert!(form.is_edit());
        let draft = form.validate().unwrap();
        assert_eq!(draft.project_id, ProjectId(2));
        assert_eq!(draft.start_date, d(5, 1));
        assert_eq!(draft.etp, 3.0);
        assert_eq!(draft.comment.as_deref(), Some("3 ETP during negotiations"));
    }
}
