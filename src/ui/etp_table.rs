use egui::{Align, Layout, RichText, Sense, Ui};

use project_timeline::etp::{format_etp, EtpSheet};

use crate::app::EtpEdit;
use crate::ui::theme::{self, Palette};

/// Render the effort sheet. Returns an edit to save when the user commits
/// a cell with Enter or by moving focus away; Escape drops the edit.
pub fn show_etp_table(
    sheet: &EtpSheet,
    editing: &mut Option<EtpEdit>,
    palette: &Palette,
    ui: &mut Ui,
) -> Option<EtpEdit> {
    let mut commit = None;

    if sheet.rows.is_empty() {
        ui.label(RichText::new("No projects yet").color(palette.text_dim));
        return None;
    }

    egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
        egui::Grid::new("etp_grid")
            .striped(true)
            .min_col_width(theme::ETP_CELL_WIDTH)
            .spacing([4.0, 6.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Project").strong());
                for period in &sheet.periods {
                    header_cell(ui, &period.label);
                }
                header_cell(ui, "Total");
                ui.end_row();

                for row in &sheet.rows {
                    ui.label(RichText::new(&row.name).color(palette.text_primary));
                    for (period, cell) in sheet.periods.iter().zip(&row.cells) {
                        let is_editing = editing
                            .as_ref()
                            .is_some_and(|e| e.project_id == row.project_id && e.period == period.label);
                        if is_editing {
                            if let Some(done) = edit_cell(ui, editing) {
                                commit = Some(done);
                            }
                            continue;
                        }

                        let text = RichText::new(format_etp(cell.value)).color(if cell.overridden {
                            palette.accent
                        } else {
                            palette.text_secondary
                        });
                        let response = ui
                            .with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.add(egui::Label::new(text).sense(Sense::click()))
                            })
                            .inner
                            .on_hover_cursor(egui::CursorIcon::Text)
                            .on_hover_text(if cell.overridden {
                                "Set manually, click to edit"
                            } else {
                                "From task ETP, click to override"
                            });
                        if response.clicked() {
                            // Clicking elsewhere saves the cell being edited first.
                            if let Some(previous) = editing.take() {
                                commit = Some(previous);
                            }
                            *editing = Some(EtpEdit {
                                project_id: row.project_id,
                                period: period.label.clone(),
                                buffer: format_etp(cell.value),
                                focus_requested: false,
                            });
                        }
                    }
                    total_cell(ui, row.total(), palette);
                    ui.end_row();
                }

                ui.label(RichText::new("Total").strong());
                for i in 0..sheet.periods.len() {
                    total_cell(ui, sheet.period_total(i), palette);
                }
                total_cell(ui, sheet.grand_total(), palette);
                ui.end_row();
            });
    });

    commit
}

fn header_cell(ui: &mut Ui, text: &str) {
    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
        ui.label(RichText::new(text).strong());
    });
}

fn total_cell(ui: &mut Ui, value: f64, palette: &Palette) {
    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
        ui.label(RichText::new(format_etp(value)).strong().color(palette.text_primary));
    });
}

fn edit_cell(ui: &mut Ui, editing: &mut Option<EtpEdit>) -> Option<EtpEdit> {
    let edit = editing.as_mut()?;
    let response = ui.add(
        egui::TextEdit::singleline(&mut edit.buffer)
            .desired_width(theme::ETP_CELL_WIDTH - 8.0)
            .horizontal_align(Align::RIGHT),
    );
    if !edit.focus_requested {
        response.request_focus();
        edit.focus_requested = true;
    }

    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        *editing = None;
        return None;
    }
    if response.lost_focus() {
        return editing.take();
    }
    None
}
