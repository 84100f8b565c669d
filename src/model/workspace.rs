use serde::{Deserialize, Serialize};

use super::etp::EtpEntry;
use super::project::{Project, ProjectId};
use super::task::{Task, TaskId};

/// Everything a backend hands to the UI in one load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub etp_entries: Vec<EtpEntry>,
}

impl Workspace {
    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_by_name(&self, name: &str) -> Option<&Project> {
        self.projects
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.projects.iter().find_map(|p| p.task(id))
    }

    pub fn task_count(&self) -> usize {
        self.projects.iter().map(|p| p.tasks.len()).sum()
    }

    pub fn etp_entry(&self, project_id: ProjectId, period: &str) -> Option<&EtpEntry> {
        self.etp_entries
            .iter()
            .find(|e| e.project_id == project_id && e.period == period)
    }
}
