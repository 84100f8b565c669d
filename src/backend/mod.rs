//! Persistence collaborators behind the board.
//!
//! The UI never talks to storage directly: it issues board commands, and the
//! board forwards them to whichever [`ProjectBackend`] was configured.

pub mod local;
pub mod rest;

pub use local::LocalBackend;
pub use rest::RestBackend;

use serde::Serialize;

use crate::error::BackendError;
use crate::forms::{ProjectDraft, TaskDraft};
use crate::model::{ProjectId, TaskId, Workspace};

/// A new value for one cell of the ETP sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EtpUpdate {
    #[serde(skip)]
    pub project_id: ProjectId,
    /// Project name, which is how the REST API identifies the row.
    pub project: String,
    pub period: String,
    pub etp: f64,
}

pub trait ProjectBackend {
    /// Short human-readable description, shown in the status bar.
    fn describe(&self) -> String;

    fn load(&mut self) -> Result<Workspace, BackendError>;

    fn create_project(&mut self, draft: &ProjectDraft) -> Result<(), BackendError>;
    fn update_project(&mut self, id: ProjectId, draft: &ProjectDraft) -> Result<(), BackendError>;
    /// Deleting a project also deletes its tasks.
    fn delete_project(&mut self, id: ProjectId) -> Result<(), BackendError>;

    fn create_task(&mut self, draft: &TaskDraft) -> Result<(), BackendError>;
    /// Updates may move the task to `draft.project_id`.
    fn update_task(&mut self, id: TaskId, draft: &TaskDraft) -> Result<(), BackendError>;
    fn delete_task(&mut self, id: TaskId) -> Result<(), BackendError>;

    fn update_etp(&mut self, update: &EtpUpdate) -> Result<(), BackendError>;
}

impl<B: ProjectBackend + ?Sized> ProjectBackend for Box<B> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn load(&mut self) -> Result<Workspace, BackendError> {
        (**self).load()
    }

    fn create_project(&mut self, draft: &ProjectDraft) -> Result<(), BackendError> {
        (**self).create_project(draft)
    }

    fn update_project(&mut self, id: ProjectId, draft: &ProjectDraft) -> Result<(), BackendError> {
        (**self).update_project(id, draft)
    }

    fn delete_project(&mut self, id: ProjectId) -> Result<(), BackendError> {
        (**self).delete_project(id)
    }

    fn create_task(&mut self, draft: &TaskDraft) -> Result<(), BackendError> {
        (**self).create_task(draft)
    }

    fn update_task(&mut self, id: TaskId, draft: &TaskDraft) -> Result<(), BackendError> {
        (**self).update_task(id, draft)
    }

    fn delete_task(&mut self, id: TaskId) -> Result<(), BackendError> {
        (**self).delete_task(id)
    }

    fn update_etp(&mut self, update: &EtpUpdate) -> Result<(), BackendError> {
        (**self).update_etp(update)
    }
}
