use serde::{Deserialize, Serialize};

use super::task::{Task, TaskId};

pub const DEFAULT_COLOR_SCHEME: &str = "blue";

/// Backend-assigned project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A timeline row: a named project and the tasks currently assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default = "default_color_scheme")]
    pub color_scheme: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

fn default_color_scheme() -> String {
    DEFAULT_COLOR_SCHEME.to_string()
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color_scheme: default_color_scheme(),
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Largest ETP among the project's tasks, 0 when it has none.
    pub fn max_effort(&self) -> f64 {
        self.tasks.iter().map(Task::effort).fold(0.0, f64::max)
    }
}
