use serde::{Deserialize, Serialize};

use super::project::ProjectId;

/// An explicit effort value for one project in one period, overriding the
/// value derived from the project's tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtpEntry {
    pub project_id: ProjectId,
    pub period: String,
    pub etp_value: f64,
}
