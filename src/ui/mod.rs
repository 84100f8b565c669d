pub mod dialogs;
pub mod etp_table;
pub mod notifications;
pub mod theme;
pub mod timeline;
pub mod toolbar;
