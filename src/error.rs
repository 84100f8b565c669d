use chrono::NaiveDate;
use thiserror::Error;

/// Rejections raised by the timeline layout core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid range: start {start} must precede end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// The item at `index` (input order) ends before it starts.
    #[error("invalid interval at position {index}: end precedes start")]
    InvalidInterval { index: usize },
}

/// Form and cell input that cannot be turned into a backend request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("end date {end} precedes start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("'{0}' is not a valid ETP value")]
    InvalidEtp(String),

    #[error("no ETP cell for project '{project}' in period '{period}'")]
    UnknownCell { project: String, period: String },

    #[error("project {0} does not exist")]
    UnknownProject(u64),

    #[error("a project named '{0}' already exists")]
    DuplicateName(String),
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum CsvError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns. Found headers: {found:?}. Need columns for: project, task, start date, end date.")]
    MissingColumns { found: Vec<String> },

    #[error("no valid tasks found in CSV ({skipped} rows skipped)")]
    NoRows { skipped: usize },
}

/// Top-level error returned by board commands.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Csv(#[from] CsvError),
}
