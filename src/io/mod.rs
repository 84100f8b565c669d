pub mod csv_export;
pub mod csv_import;
pub mod file;

pub use csv_export::{export_etp_csv, write_etp_csv};
pub use csv_import::{import_csv, parse_csv, ImportReport, ImportRow};
pub use file::{load_workspace, save_workspace};
