use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::{Datelike, NaiveDate};

use project_timeline::backend::ProjectBackend;
use project_timeline::etp::EtpSheet;
use project_timeline::forms::{ProjectForm, TaskForm};
use project_timeline::layout::TimeAxis;
use project_timeline::model::{Granularity, ProjectId, TaskId, VisibleRange};
use project_timeline::notify::{NotificationKind, NotificationService};
use project_timeline::settings::{self, AppSettings, BackendSettings};
use project_timeline::{Board, Error, Outcome};

use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Timeline,
    Etp,
}

/// The modal currently open, with the form it edits.
pub enum Dialog {
    Project(ProjectForm),
    Task(TaskForm),
}

pub enum Confirm {
    DeleteProject { id: ProjectId, name: String },
    DeleteTask { id: TaskId, text: String },
}

/// An ETP cell being edited in place.
pub struct EtpEdit {
    pub project_id: ProjectId,
    pub period: String,
    pub buffer: String,
    pub focus_requested: bool,
}

/// Main application state.
pub struct TimelineApp {
    pub board: Option<Board<Box<dyn ProjectBackend>>>,
    pub settings: AppSettings,
    pub notifications: NotificationService,
    pub view: View,
    pub range: VisibleRange,
    pub hidden_projects: HashSet<ProjectId>,
    pub dialog: Option<Dialog>,
    pub confirm: Option<Confirm>,
    pub etp_edit: Option<EtpEdit>,
    /// Shown in place of the views when no backend could be opened.
    pub load_error: Option<String>,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let mut notifications = NotificationService::default();
        let now = Instant::now();
        let (board, load_error) = match open_board(&settings.backend) {
            Ok(board) => (Some(board), None),
            Err(e) => {
                tracing::error!(error = %e, "could not open the configured backend");
                notifications.show(
                    format!("Could not load projects: {e}"),
                    NotificationKind::Error,
                    now,
                );
                match open_board(&BackendSettings::default()) {
                    Ok(board) => {
                        notifications.show(
                            "Working on the local workspace instead",
                            NotificationKind::Warning,
                            now,
                        );
                        (Some(board), None)
                    }
                    Err(fallback) => (None, Some(fallback.to_string())),
                }
            }
        };

        let today = chrono::Local::now().date_naive();
        let range = board
            .as_ref()
            .and_then(|b| b.projects().iter().flat_map(|p| &p.tasks).map(|t| t.start).min())
            .map_or_else(|| year_range(today), year_range);

        Self {
            board,
            settings,
            notifications,
            view: View::Timeline,
            range,
            hidden_projects: HashSet::new(),
            dialog: None,
            confirm: None,
            etp_edit: None,
            load_error,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.settings.granularity
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notifications.show(message, kind, Instant::now());
    }

    /// Report a command result as a toast. Returns whether it succeeded.
    fn report(&mut self, result: Result<Outcome, Error>) -> bool {
        match result {
            Ok(outcome) => {
                self.notify(outcome.to_string(), NotificationKind::Success);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "command failed");
                let kind = match e {
                    Error::Validation(_) => NotificationKind::Warning,
                    _ => NotificationKind::Error,
                };
                self.notify(e.to_string(), kind);
                false
            }
        }
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.settings.save() {
            tracing::warn!(error = %e, "could not save settings");
        }
    }

    // --- Navigation ---

    pub fn pan(&mut self, steps: i32) {
        self.range = self.range.shifted(self.granularity(), steps);
        self.etp_edit = None;
    }

    pub fn toggle_granularity(&mut self) {
        self.settings.granularity = self.settings.granularity.toggled();
        self.save_settings();
    }

    pub fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggled();
        self.save_settings();
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.etp_edit = None;
        }
    }

    pub fn toggle_project(&mut self, id: ProjectId) {
        if !self.hidden_projects.remove(&id) {
            self.hidden_projects.insert(id);
        }
    }

    /// Effort sheet over the visible range, one column per quarter.
    pub fn etp_sheet(&self) -> Option<EtpSheet> {
        let board = self.board.as_ref()?;
        let axis = etp_axis(&self.range).ok()?;
        Some(EtpSheet::build(board.workspace(), &axis))
    }

    // --- Dialogs ---

    pub fn new_project(&mut self) {
        self.dialog = Some(Dialog::Project(ProjectForm::default()));
    }

    pub fn edit_project(&mut self, id: ProjectId) {
        if let Some(project) = self.board.as_ref().and_then(|b| b.project(id)) {
            self.dialog = Some(Dialog::Project(ProjectForm::from_project(project)));
        }
    }

    pub fn new_task(&mut self, project_id: Option<ProjectId>) {
        let project_id =
            project_id.or_else(|| self.board.as_ref()?.projects().first().map(|p| p.id));
        let today = chrono::Local::now().date_naive();
        self.dialog = Some(Dialog::Task(TaskForm::new(today, project_id)));
    }

    pub fn edit_task(&mut self, id: TaskId) {
        if let Some(task) = self.board.as_ref().and_then(|b| b.workspace().task(id)) {
            self.dialog = Some(Dialog::Task(TaskForm::from_task(task)));
        }
    }

    /// Send the open dialog's form. The dialog stays open when it fails.
    pub fn submit_dialog(&mut self, dialog: Dialog) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let result = match &dialog {
            Dialog::Project(form) => board.submit_project(form),
            Dialog::Task(form) => board.submit_task(form),
        };
        if !self.report(result) {
            self.dialog = Some(dialog);
        }
    }

    pub fn confirmed(&mut self, confirm: Confirm) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let result = match confirm {
            Confirm::DeleteProject { id, .. } => {
                self.hidden_projects.remove(&id);
                board.delete_project(id)
            }
            Confirm::DeleteTask { id, .. } => board.delete_task(id),
        };
        self.report(result);
    }

    pub fn commit_etp(&mut self, edit: EtpEdit) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let result = board.update_etp(edit.project_id, &edit.period, &edit.buffer);
        self.report(result);
    }

    // --- Files ---

    pub fn refresh(&mut self) {
        if let Some(board) = self.board.as_mut() {
            let result = board.refresh();
            self.report(result);
        }
    }

    pub fn import_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        else {
            return;
        };
        let report = match project_timeline::io::import_csv(&path) {
            Ok(report) => report,
            Err(e) => {
                self.notify(format!("CSV import failed: {e}"), NotificationKind::Error);
                return;
            }
        };
        if let Some(board) = self.board.as_mut() {
            let result = board.import_tasks(&report);
            self.report(result);
        }
    }

    pub fn export_etp(&mut self) {
        let Some(sheet) = self.etp_sheet() else {
            return;
        };
        if sheet.rows.is_empty() {
            self.notify("Nothing to export, there are no projects", NotificationKind::Info);
            return;
        }
        let default_name = format!("etp-{}.csv", self.range.start.format("%Y-%m"));
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&default_name)
            .save_file()
        else {
            return;
        };
        match project_timeline::io::export_etp_csv(&sheet, &path) {
            Ok(count) => self.notify(
                format!("Exported ETP for {count} projects"),
                NotificationKind::Success,
            ),
            Err(e) => self.notify(format!("CSV export failed: {e}"), NotificationKind::Error),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self.settings.backend, BackendSettings::Local { .. })
    }

    pub fn open_data_folder(&mut self) {
        let dir = match &self.settings.backend {
            BackendSettings::Local { path: Some(path) } => path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(settings::data_dir),
            _ => settings::data_dir(),
        };
        if let Err(e) = open::that(&dir) {
            self.notify(format!("Could not open {}: {e}", dir.display()), NotificationKind::Error);
        }
    }

    pub fn backend_label(&self) -> String {
        self.board
            .as_ref()
            .map(|b| b.backend().describe())
            .unwrap_or_default()
    }
}

fn open_board(settings: &BackendSettings) -> Result<Board<Box<dyn ProjectBackend>>, Error> {
    let backend = settings.open()?;
    Board::open(backend)
}

/// Calendar quarters covering `range`. Period labels are stored as ETP keys,
/// so the columns never follow a month pan.
fn etp_axis(range: &VisibleRange) -> Result<TimeAxis, project_timeline::LayoutError> {
    TimeAxis::build(&range.quarter_aligned(), Granularity::Quarter)
}

fn year_range(date: NaiveDate) -> VisibleRange {
    VisibleRange::year(date.year()).unwrap_or(VisibleRange {
        start: date,
        end: date + chrono::Duration::days(365),
    })
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx, self.settings.theme);
        let palette = ui::theme::palette(self.settings.theme);

        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::default()
                    .fill(palette.bg_header)
                    .inner_margin(egui::Margin::symmetric(10.0, 6.0)),
            )
            .show(ctx, |ui| {
                ui::toolbar::show_toolbar(self, ui);
            });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::default()
                    .fill(palette.bg_header)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(self.backend_label())
                            .size(10.5)
                            .color(palette.text_secondary),
                    );
                    if let Some(board) = &self.board {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                egui::RichText::new(format!(
                                    "Projects: {} · Tasks: {}",
                                    board.projects().len(),
                                    board.workspace().task_count()
                                ))
                                .size(10.5)
                                .color(palette.text_dim),
                            );
                        });
                    }
                });
            });

        let chart_frame = egui::Frame::default()
            .fill(palette.bg)
            .inner_margin(egui::Margin::same(8.0));
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            if let Some(error) = &self.load_error {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new(format!("No workspace available: {error}"))
                            .color(palette.today_line),
                    );
                });
                return;
            }
            match self.view {
                View::Timeline => {
                    let action = self.board.as_ref().and_then(|board| {
                        ui::timeline::show_timeline(
                            board.projects(),
                            &self.hidden_projects,
                            &self.range,
                            self.settings.granularity,
                            palette,
                            ui,
                        )
                    });
                    match action {
                        Some(ui::timeline::TimelineAction::EditTask(id)) => self.edit_task(id),
                        Some(ui::timeline::TimelineAction::EditProject(id)) => {
                            self.edit_project(id)
                        }
                        Some(ui::timeline::TimelineAction::AddTask(id)) => self.new_task(Some(id)),
                        Some(ui::timeline::TimelineAction::ToggleProject(id)) => {
                            self.toggle_project(id)
                        }
                        None => {}
                    }
                }
                View::Etp => {
                    if let Some(sheet) = self.etp_sheet() {
                        if let Some(edit) =
                            ui::etp_table::show_etp_table(&sheet, &mut self.etp_edit, palette, ui)
                        {
                            self.commit_etp(edit);
                        }
                    }
                }
            }
        });

        ui::dialogs::show_dialogs(self, ctx);

        let now = Instant::now();
        self.notifications.prune(now);
        ui::notifications::show_notifications(&self.notifications, now, ctx);
        if !self.notifications.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_settings_open_a_seeded_board() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BackendSettings::Local {
            path: Some(dir.path().join("w.json")),
        };
        let board = open_board(&settings).unwrap();
        assert!(!board.projects().is_empty());
    }

    #[test]
    fn etp_periods_keep_their_windows_after_a_month_pan() {
        let d = |y, m| NaiveDate::from_ymd_opt(y, m, 1).unwrap();
        let year = year_range(d(2025, 6));
        let before = etp_axis(&year).unwrap();
        let after = etp_axis(&year.shifted(Granularity::Month, 1)).unwrap();

        assert_eq!(&after.columns[..4], &before.columns[..]);
        assert_eq!(after.column_bounds(1), Some((d(2025, 4), d(2025, 7))));
        assert_eq!(after.columns[1].label, "Q2 2025");
        assert_eq!(after.columns[4].label, "Q1 2026");
        assert_eq!(after.len(), 5);
    }

    #[test]
    fn year_range_spans_the_whole_year() {
        let range = year_range(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
