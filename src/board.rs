//! Commands behind the UI: validate input, call the backend, reload.
//!
//! Every mutation returns an [`Outcome`] whose `Display` text is what the
//! user sees in the success toast. When a command fails the snapshot is left
//! as it was before the call.

use std::collections::BTreeSet;
use std::fmt;

use crate::backend::{EtpUpdate, ProjectBackend};
use crate::error::{BackendError, Error, ValidationError};
use crate::etp::{format_etp, parse_etp};
use crate::forms::{ProjectDraft, ProjectForm, TaskDraft, TaskForm};
use crate::io::ImportReport;
use crate::model::project::DEFAULT_COLOR_SCHEME;
use crate::model::task::DEFAULT_ETP;
use crate::model::{EtpEntry, Project, ProjectId, TaskId, Workspace};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Refreshed { projects: usize, tasks: usize },
    ProjectCreated(String),
    ProjectUpdated(String),
    ProjectDeleted(String),
    TaskCreated(String),
    TaskUpdated(String),
    TaskDeleted(String),
    EtpUpdated { project: String, period: String, value: f64 },
    Imported { tasks: usize, new_projects: usize, skipped: usize },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Refreshed { projects, tasks } => {
                write!(f, "Loaded {projects} projects and {tasks} tasks")
            }
            Outcome::ProjectCreated(name) => write!(f, "Project \"{name}\" created"),
            Outcome::ProjectUpdated(name) => write!(f, "Project \"{name}\" updated"),
            Outcome::ProjectDeleted(name) => write!(f, "Project \"{name}\" deleted"),
            Outcome::TaskCreated(text) => write!(f, "Task \"{text}\" created"),
            Outcome::TaskUpdated(text) => write!(f, "Task \"{text}\" updated"),
            Outcome::TaskDeleted(text) => write!(f, "Task \"{text}\" deleted"),
            Outcome::EtpUpdated { project, period, value } => {
                write!(f, "ETP for {project} in {period} set to {}", format_etp(*value))
            }
            Outcome::Imported { tasks, new_projects, skipped } => {
                write!(f, "Imported {tasks} tasks")?;
                if *new_projects > 0 {
                    write!(f, ", {new_projects} new projects")?;
                }
                if *skipped > 0 {
                    write!(f, " ({skipped} rows skipped)")?;
                }
                Ok(())
            }
        }
    }
}

pub struct Board<B> {
    backend: B,
    workspace: Workspace,
    /// ETP values posted this session, kept for backends whose listing
    /// leaves them out.
    posted_etp: Vec<EtpEntry>,
}

impl<B: ProjectBackend> Board<B> {
    /// Load the initial snapshot from `backend`.
    pub fn open(mut backend: B) -> Result<Self, Error> {
        let workspace = backend.load()?;
        tracing::info!(
            backend = %backend.describe(),
            projects = workspace.projects.len(),
            tasks = workspace.task_count(),
            "workspace loaded"
        );
        Ok(Self {
            backend,
            workspace,
            posted_etp: Vec::new(),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn projects(&self) -> &[Project] {
        &self.workspace.projects
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.workspace.project(id)
    }

    pub fn etp_entries(&self) -> &[EtpEntry] {
        &self.workspace.etp_entries
    }

    pub fn refresh(&mut self) -> Result<Outcome, Error> {
        self.reload()?;
        Ok(Outcome::Refreshed {
            projects: self.workspace.projects.len(),
            tasks: self.workspace.task_count(),
        })
    }

    fn reload(&mut self) -> Result<(), Error> {
        let mut workspace = self.backend.load()?;
        self.posted_etp
            .retain(|entry| workspace.project(entry.project_id).is_some());
        for entry in &self.posted_etp {
            if workspace.etp_entry(entry.project_id, &entry.period).is_none() {
                workspace.etp_entries.push(entry.clone());
            }
        }
        self.workspace = workspace;
        Ok(())
    }

    fn remember_etp(&mut self, entry: EtpEntry) {
        match self
            .posted_etp
            .iter_mut()
            .find(|e| e.project_id == entry.project_id && e.period == entry.period)
        {
            Some(existing) => existing.etp_value = entry.etp_value,
            None => self.posted_etp.push(entry),
        }
    }

    pub fn submit_project(&mut self, form: &ProjectForm) -> Result<Outcome, Error> {
        let draft = form.validate()?;
        if let Some(existing) = self.workspace.project_by_name(&draft.name) {
            if Some(existing.id) != form.id {
                return Err(ValidationError::DuplicateName(draft.name).into());
            }
        }

        let outcome = match form.id {
            Some(id) => {
                if self.project(id).is_none() {
                    return Err(ValidationError::UnknownProject(id.0).into());
                }
                self.backend.update_project(id, &draft)?;
                tracing::info!(%id, name = %draft.name, "project updated");
                Outcome::ProjectUpdated(draft.name)
            }
            None => {
                self.backend.create_project(&draft)?;
                tracing::info!(name = %draft.name, "project created");
                Outcome::ProjectCreated(draft.name)
            }
        };
        self.reload()?;
        Ok(outcome)
    }

    pub fn delete_project(&mut self, id: ProjectId) -> Result<Outcome, Error> {
        let name = self
            .project(id)
            .map(|p| p.name.clone())
            .ok_or(ValidationError::UnknownProject(id.0))?;
        self.backend.delete_project(id)?;
        tracing::info!(%id, %name, "project deleted");
        self.reload()?;
        Ok(Outcome::ProjectDeleted(name))
    }

    pub fn submit_task(&mut self, form: &TaskForm) -> Result<Outcome, Error> {
        let draft = form.validate()?;
        if self.project(draft.project_id).is_none() {
            return Err(ValidationError::UnknownProject(draft.project_id.0).into());
        }

        let outcome = match form.id {
            Some(id) => {
                self.backend.update_task(id, &draft)?;
                tracing::info!(%id, project = %draft.project_id, "task updated");
                Outcome::TaskUpdated(draft.text)
            }
            None => {
                self.backend.create_task(&draft)?;
                tracing::info!(project = %draft.project_id, "task created");
                Outcome::TaskCreated(draft.text)
            }
        };
        self.reload()?;
        Ok(outcome)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<Outcome, Error> {
        let text = self
            .workspace
            .task(id)
            .map(|t| t.text.clone())
            .ok_or_else(|| BackendError::NotFound(format!("task {id}")))?;
        self.backend.delete_task(id)?;
        tracing::info!(%id, "task deleted");
        self.reload()?;
        Ok(Outcome::TaskDeleted(text))
    }

    /// Store an explicit ETP value for one project and period.
    pub fn update_etp(
        &mut self,
        project_id: ProjectId,
        period: &str,
        raw: &str,
    ) -> Result<Outcome, Error> {
        let etp = parse_etp(raw)?;
        let project = self
            .project(project_id)
            .map(|p| p.name.clone())
            .ok_or(ValidationError::UnknownProject(project_id.0))?;
        self.backend.update_etp(&EtpUpdate {
            project_id,
            project: project.clone(),
            period: period.to_string(),
            etp,
        })?;
        tracing::info!(%project, period, etp, "ETP updated");
        self.remember_etp(EtpEntry {
            project_id,
            period: period.to_string(),
            etp_value: etp,
        });
        self.reload()?;
        Ok(Outcome::EtpUpdated {
            project,
            period: period.to_string(),
            value: etp,
        })
    }

    /// Create the tasks of an import, adding projects that do not exist yet.
    ///
    /// Rows are written one by one, so a failure part way through leaves the
    /// earlier rows in place; the snapshot is reloaded either way.
    pub fn import_tasks(&mut self, report: &ImportReport) -> Result<Outcome, Error> {
        let result = self.write_import(report);
        let reloaded = self.reload();
        let (tasks, new_projects) = result?;
        reloaded?;
        tracing::info!(tasks, new_projects, skipped = report.skipped, "import finished");
        Ok(Outcome::Imported {
            tasks,
            new_projects,
            skipped: report.skipped,
        })
    }

    fn write_import(&mut self, report: &ImportReport) -> Result<(usize, usize), Error> {
        let missing: BTreeSet<&str> = report
            .rows
            .iter()
            .map(|row| row.project.trim())
            .filter(|name| self.workspace.project_by_name(name).is_none())
            .collect();
        let mut seen: Vec<String> = Vec::new();
        for name in &missing {
            // Names differing only in case map to one project.
            if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
                continue;
            }
            self.backend.create_project(&ProjectDraft {
                name: name.to_string(),
                color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
            })?;
            seen.push(name.to_string());
        }
        if !seen.is_empty() {
            self.reload()?;
        }

        for row in &report.rows {
            let project_id = self
                .workspace
                .project_by_name(&row.project)
                .map(|p| p.id)
                .ok_or_else(|| BackendError::NotFound(format!("project {}", row.project)))?;
            self.backend.create_task(&TaskDraft {
                project_id,
                text: row.text.clone(),
                comment: row.comment.clone(),
                start_date: row.start,
                end_date: row.end,
                etp: row.etp.unwrap_or(DEFAULT_ETP),
                color: row.color.clone(),
            })?;
        }
        Ok((report.rows.len(), seen.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use crate::io::ImportRow;
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn board(dir: &tempfile::TempDir) -> Board<LocalBackend> {
        let backend = LocalBackend::with_workspace(dir.path().join("w.json"), Workspace::default());
        Board::open(backend).unwrap()
    }

    fn named(name: &str) -> ProjectForm {
        ProjectForm {
            name: name.into(),
            ..ProjectForm::default()
        }
    }

    fn add_project(board: &mut Board<LocalBackend>, name: &str) -> ProjectId {
        board.submit_project(&named(name)).unwrap();
        board.workspace().project_by_name(name).unwrap().id
    }

    #[test]
    fn project_commands_report_what_happened() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board(&dir);

        let created = board.submit_project(&named("  Observability ")).unwrap();
        assert_eq!(created.to_string(), "Project \"Observability\" created");

        let mut form = ProjectForm::from_project(&board.projects()[0]);
        form.name = "Observability & SRE".into();
        let updated = board.submit_project(&form).unwrap();
        assert_eq!(updated, Outcome::ProjectUpdated("Observability & SRE".into()));
        assert_eq!(board.projects()[0].name, "Observability & SRE");

        let id = board.projects()[0].id;
        let deleted = board.delete_project(id).unwrap();
        assert_eq!(deleted.to_string(), "Project \"Observability & SRE\" deleted");
        assert!(board.projects().is_empty());
    }

    #[test]
    fn failed_commands_leave_the_snapshot_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board(&dir);
        add_project(&mut board, "TOM");
        let before = board.workspace().clone();

        assert!(matches!(
            board.submit_project(&named("tom")),
            Err(Error::Validation(ValidationError::DuplicateName(_)))
        ));
        assert!(matches!(
            board.submit_project(&named("   ")),
            Err(Error::Validation(ValidationError::Required(_)))
        ));
        assert!(matches!(
            board.delete_project(ProjectId(404)),
            Err(Error::Validation(ValidationError::UnknownProject(404)))
        ));
        assert_eq!(board.workspace(), &before);
    }

    #[test]
    fn task_commands_create_update_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board(&dir);
        let id = add_project(&mut board, "EUS");

        let mut form = TaskForm::new(d(2, 1), Some(id));
        form.text = "Due Diligence".into();
        form.end = d(5, 1);
        let created = board.submit_task(&form).unwrap();
        assert_eq!(created.to_string(), "Task \"Due Diligence\" created");

        let task = board.project(id).unwrap().tasks[0].clone();
        let mut form = TaskForm::from_task(&task);
        form.etp = "2,5".into();
        board.submit_task(&form).unwrap();
        assert_eq!(board.workspace().task(task.id).unwrap().etp, Some(2.5));

        let deleted = board.delete_task(task.id).unwrap();
        assert_eq!(deleted, Outcome::TaskDeleted("Due Diligence".into()));
        assert_eq!(board.workspace().task_count(), 0);
    }

    #[test]
    fn tasks_need_an_existing_project() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board(&dir);
        let mut form = TaskForm::new(d(1, 1), Some(ProjectId(9)));
        form.text = "orphan".into();
        assert!(matches!(
            board.submit_task(&form),
            Err(Error::Validation(ValidationError::UnknownProject(9)))
        ));
    }

    #[test]
    fn etp_updates_validate_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board(&dir);
        let id = add_project(&mut board, "VIP/Events");

        assert!(matches!(
            board.update_etp(id, "Q1 2025", "lots"),
            Err(Error::Validation(ValidationError::InvalidEtp(_)))
        ));
        let outcome = board.update_etp(id, "Q1 2025", "1.25").unwrap();
        assert_eq!(outcome.to_string(), "ETP for VIP/Events in Q1 2025 set to 1.25");
        assert_eq!(board.etp_entries().len(), 1);
    }

    /// Accepts ETP posts but lists none back, like the web service.
    struct UnlistedEtp(LocalBackend);

    impl ProjectBackend for UnlistedEtp {
        fn describe(&self) -> String {
            self.0.describe()
        }

        fn load(&mut self) -> Result<Workspace, BackendError> {
            let mut workspace = self.0.load()?;
            workspace.etp_entries.clear();
            Ok(workspace)
        }

        fn create_project(&mut self, draft: &ProjectDraft) -> Result<(), BackendError> {
            self.0.create_project(draft)
        }

        fn update_project(&mut self, id: ProjectId, draft: &ProjectDraft) -> Result<(), BackendError> {
            self.0.update_project(id, draft)
        }

        fn delete_project(&mut self, id: ProjectId) -> Result<(), BackendError> {
            self.0.delete_project(id)
        }

        fn create_task(&mut self, draft: &TaskDraft) -> Result<(), BackendError> {
            self.0.create_task(draft)
        }

        fn update_task(&mut self, id: TaskId, draft: &TaskDraft) -> Result<(), BackendError> {
            self.0.update_task(id, draft)
        }

        fn delete_task(&mut self, id: TaskId) -> Result<(), BackendError> {
            self.0.delete_task(id)
        }

        fn update_etp(&mut self, update: &EtpUpdate) -> Result<(), BackendError> {
            self.0.update_etp(update)
        }
    }

    #[test]
    fn posted_etp_survives_reload_when_backend_does_not_list_it() {
        use crate::etp::EtpSheet;
        use crate::layout::TimeAxis;
        use crate::model::{Granularity, VisibleRange};

        let dir = tempfile::tempdir().unwrap();
        let local = LocalBackend::with_workspace(dir.path().join("w.json"), Workspace::default());
        let mut board = Board::open(UnlistedEtp(local)).unwrap();
        board.submit_project(&named("Alpha")).unwrap();
        board.submit_project(&named("Beta")).unwrap();
        let alpha = board.workspace().project_by_name("Alpha").unwrap().id;
        let beta = board.workspace().project_by_name("Beta").unwrap().id;

        board.update_etp(alpha, "Q1 2025", "2.5").unwrap();
        board.update_etp(beta, "Q1 2025", "1").unwrap();
        board.update_etp(alpha, "Q1 2025", "3").unwrap();
        board.refresh().unwrap();

        let axis = TimeAxis::build(&VisibleRange::year(2025).unwrap(), Granularity::Quarter).unwrap();
        let sheet = EtpSheet::build(board.workspace(), &axis);
        let cell = sheet.cell(alpha, "Q1 2025").unwrap();
        assert_eq!(cell.value, 3.0);
        assert!(cell.overridden);
        assert_eq!(sheet.period_total(0), 4.0);
        assert_eq!(board.etp_entries().len(), 2);

        board.delete_project(beta).unwrap();
        assert_eq!(board.etp_entries().len(), 1);
    }

    #[test]
    fn import_creates_missing_projects_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board(&dir);
        add_project(&mut board, "TOM");

        let row = |project: &str, text: &str| ImportRow {
            project: project.into(),
            text: text.into(),
            start: d(1, 1),
            end: d(2, 1),
            etp: None,
            color: None,
            comment: None,
        };
        let report = ImportReport {
            rows: vec![row("tom", "a"), row("Data", "b"), row("DATA", "c")],
            skipped: 2,
        };

        let outcome = board.import_tasks(&report).unwrap();
        assert_eq!(
            outcome.to_string(),
            "Imported 3 tasks, 1 new projects (2 rows skipped)"
        );
        assert_eq!(board.projects().len(), 2);
        assert_eq!(board.workspace().project_by_name("data").unwrap().tasks.len(), 2);
    }

    #[test]
    fn refresh_counts_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board(&dir);
        add_project(&mut board, "A");
        assert_eq!(
            board.refresh().unwrap(),
            Outcome::Refreshed { projects: 1, tasks: 0 }
        );
    }
}
