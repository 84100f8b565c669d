//! Workspace kept in a JSON file on this machine.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::{EtpUpdate, ProjectBackend};
use crate::error::{BackendError, ValidationError};
use crate::forms::{ProjectDraft, TaskDraft};
use crate::io::file::{load_workspace, save_workspace};
use crate::model::{EtpEntry, Project, ProjectId, Task, TaskId, Workspace};

/// Shades handed out to new tasks, darkest first.
const TASK_SHADES: &[u16] = &[600, 500, 400];

#[derive(Debug)]
pub struct LocalBackend {
    path: PathBuf,
    workspace: Workspace,
    next_id: u64,
}

impl LocalBackend {
    /// Open the workspace at `path`, seeding it with sample data when the
    /// file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let path = path.into();
        let workspace = if path.exists() {
            load_workspace(&path)?
        } else {
            tracing::info!(path = %path.display(), "creating workspace with sample data");
            let workspace = sample_workspace();
            save_workspace(&workspace, &path)?;
            workspace
        };
        Ok(Self::with_workspace(path, workspace))
    }

    /// Wrap an in-memory workspace; it is written to `path` on the first change.
    pub fn with_workspace(path: impl Into<PathBuf>, workspace: Workspace) -> Self {
        let next_id = workspace
            .projects
            .iter()
            .map(|p| p.id.0)
            .chain(workspace.projects.iter().flat_map(|p| p.tasks.iter().map(|t| t.id.0)))
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            path: path.into(),
            workspace,
            next_id,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn persist(&self) -> Result<(), BackendError> {
        save_workspace(&self.workspace, &self.path)
    }

    fn ensure_unique_name(&self, name: &str, except: Option<ProjectId>) -> Result<(), BackendError> {
        match self.workspace.project_by_name(name) {
            Some(existing) if Some(existing.id) != except => {
                Err(ValidationError::DuplicateName(name.to_string()).into())
            }
            _ => Ok(()),
        }
    }

    fn project_mut(&mut self, id: ProjectId) -> Result<&mut Project, BackendError> {
        self.workspace
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("project {id}")))
    }

    /// Remove a task from whichever project holds it.
    fn take_task(&mut self, id: TaskId) -> Result<Task, BackendError> {
        for project in &mut self.workspace.projects {
            if let Some(pos) = project.tasks.iter().position(|t| t.id == id) {
                return Ok(project.tasks.remove(pos));
            }
        }
        Err(BackendError::NotFound(format!("task {id}")))
    }
}

impl ProjectBackend for LocalBackend {
    fn describe(&self) -> String {
        format!("Local file {}", self.path.display())
    }

    fn load(&mut self) -> Result<Workspace, BackendError> {
        Ok(self.workspace.clone())
    }

    fn create_project(&mut self, draft: &ProjectDraft) -> Result<(), BackendError> {
        self.ensure_unique_name(&draft.name, None)?;
        let id = ProjectId(self.allocate_id());
        let mut project = Project::new(id, draft.name.clone());
        project.color_scheme = draft.color_scheme.clone();
        self.workspace.projects.push(project);
        self.persist()
    }

    fn update_project(&mut self, id: ProjectId, draft: &ProjectDraft) -> Result<(), BackendError> {
        self.ensure_unique_name(&draft.name, Some(id))?;
        let project = self.project_mut(id)?;
        project.name = draft.name.clone();
        project.color_scheme = draft.color_scheme.clone();
        self.persist()
    }

    fn delete_project(&mut self, id: ProjectId) -> Result<(), BackendError> {
        let before = self.workspace.projects.len();
        self.workspace.projects.retain(|p| p.id != id);
        if self.workspace.projects.len() == before {
            return Err(BackendError::NotFound(format!("project {id}")));
        }
        self.workspace.etp_entries.retain(|e| e.project_id != id);
        self.persist()
    }

    fn create_task(&mut self, draft: &TaskDraft) -> Result<(), BackendError> {
        let id = TaskId(self.allocate_id());
        let project = self.project_mut(draft.project_id)?;
        let shade = TASK_SHADES[project.tasks.len() % TASK_SHADES.len()];
        let mut task = task_from_draft(id, draft);
        if task.color.is_none() {
            task.color = Some(format!("{}-{}", project.color_scheme, shade));
        }
        project.tasks.push(task);
        self.persist()
    }

    fn update_task(&mut self, id: TaskId, draft: &TaskDraft) -> Result<(), BackendError> {
        // Check the destination first so a bad move leaves the task in place.
        self.project_mut(draft.project_id)?;
        let previous = self.take_task(id)?;
        let mut task = task_from_draft(id, draft);
        task.color = task.color.or(previous.color);
        self.project_mut(draft.project_id)?.tasks.push(task);
        self.persist()
    }

    fn delete_task(&mut self, id: TaskId) -> Result<(), BackendError> {
        self.take_task(id)?;
        self.persist()
    }

    fn update_etp(&mut self, update: &EtpUpdate) -> Result<(), BackendError> {
        self.project_mut(update.project_id)?;
        let entries = &mut self.workspace.etp_entries;
        match entries
            .iter_mut()
            .find(|e| e.project_id == update.project_id && e.period == update.period)
        {
            Some(entry) => entry.etp_value = update.etp,
            None => entries.push(EtpEntry {
                project_id: update.project_id,
                period: update.period.clone(),
                etp_value: update.etp,
            }),
        }
        self.persist()
    }
}

fn task_from_draft(id: TaskId, draft: &TaskDraft) -> Task {
    let mut task = Task::new(
        id,
        draft.project_id,
        draft.text.clone(),
        draft.start_date,
        draft.end_date,
    );
    task.comment = draft.comment.clone();
    task.etp = Some(draft.etp);
    task.color = draft.color.clone();
    task
}

type SeedTask = (&'static str, (i32, u32, u32), (i32, u32, u32), &'static str, f64);

const SAMPLE_PROJECTS: &[(&str, &str)] = &[
    ("Procurement", "blue"),
    ("Workforce & HR", "purple"),
    ("EUS", "green"),
    ("VIP/Events", "yellow"),
    ("Employee Experience", "red"),
    ("Process Data Analytics", "indigo"),
    ("Observability", "teal"),
    ("TOM", "gray"),
];

/// Sample tasks, keyed by position in `SAMPLE_PROJECTS`.
const SAMPLE_TASKS: &[(usize, SeedTask)] = &[
    (0, ("Contracts & RFI", (2025, 3, 1), (2025, 5, 1), "blue-600", 1.0)),
    (0, ("RFP & Negotiations", (2025, 5, 1), (2025, 9, 1), "blue-500", 1.0)),
    (1, ("Initiation", (2025, 3, 1), (2025, 5, 1), "purple-600", 1.0)),
    (1, ("Analysis & Design", (2025, 5, 1), (2025, 9, 1), "purple-500", 1.0)),
    (1, ("Change Support & Rollout", (2025, 9, 1), (2027, 12, 30), "purple-400", 1.0)),
    (2, ("Due Diligence", (2025, 2, 1), (2025, 5, 1), "green-600", 1.0)),
    (2, ("RFP", (2025, 5, 1), (2025, 9, 1), "green-500", 3.0)),
    (2, ("Pilot & Deploy", (2025, 9, 1), (2025, 12, 30), "green-400", 1.0)),
    (3, ("Analysis & Design", (2025, 3, 1), (2025, 5, 1), "yellow-600", 1.0)),
    (4, ("Benchmark & Design", (2025, 3, 1), (2025, 5, 1), "red-600", 1.0)),
    (4, ("Implementation & Optimization", (2025, 5, 1), (2025, 9, 1), "red-500", 1.0)),
    (5, ("Audit & Roadmap", (2025, 2, 1), (2025, 4, 30), "indigo-600", 1.0)),
    (5, ("Implementation & Migration", (2025, 5, 1), (2025, 6, 30), "indigo-500", 1.0)),
    (6, ("Strategy & Design", (2025, 2, 1), (2025, 4, 30), "teal-600", 1.0)),
    (6, ("POC & Implementation", (2025, 5, 1), (2025, 6, 30), "teal-500", 1.0)),
    (7, ("Analysis & Design", (2025, 2, 1), (2025, 4, 30), "gray-600", 1.0)),
    (7, ("Implementation & Transition", (2025, 5, 1), (2025, 6, 30), "gray-500", 1.0)),
];

/// Starter workspace written on first launch.
pub fn sample_workspace() -> Workspace {
    let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

    let mut projects: Vec<Project> = SAMPLE_PROJECTS
        .iter()
        .zip(1..)
        .map(|(&(name, scheme), id)| {
            let mut project = Project::new(ProjectId(id), name);
            project.color_scheme = scheme.to_string();
            project
        })
        .collect();

    let mut next_id = projects.len() as u64 + 1;
    for &(index, (text, start, end, color, etp)) in SAMPLE_TASKS {
        let project = &mut projects[index];
        let mut task = Task::new(TaskId(next_id), project.id, text, date(start), date(end));
        next_id += 1;
        task.color = Some(color.to_string());
        task.etp = Some(etp);
        project.tasks.push(task);
    }

    Workspace {
        projects,
        etp_entries: Vec::new(),
    }
}
