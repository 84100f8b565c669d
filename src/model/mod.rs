pub mod etp;
pub mod project;
pub mod range;
pub mod task;
pub mod workspace;

pub use etp::EtpEntry;
pub use project::{Project, ProjectId};
pub use range::{Granularity, VisibleRange};
pub use task::{Task, TaskId};
pub use workspace::Workspace;
