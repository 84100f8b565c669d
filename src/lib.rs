//! Project timeline planner: a time axis split into month or quarter columns,
//! tasks packed into non-overlapping lanes per project, and a per-period
//! effort (ETP) sheet, over a local JSON file or a REST service.

pub mod backend;
pub mod board;
pub mod error;
pub mod etp;
pub mod forms;
pub mod io;
pub mod layout;
pub mod model;
pub mod notify;
pub mod settings;

pub use board::{Board, Outcome};
pub use error::{BackendError, CsvError, Error, LayoutError, ValidationError};
