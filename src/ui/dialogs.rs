use egui::{Color32, Context, RichText, Window};
use egui_phosphor::regular as icons;

use project_timeline::forms::{ProjectForm, TaskForm, COLOR_SCHEMES};
use project_timeline::model::Project;

use crate::app::{Confirm, Dialog, TimelineApp};
use crate::ui::theme::{self, Palette};

const DIALOG_WIDTH: f32 = 360.0;

enum Choice {
    Keep,
    Cancel,
    Submit,
    Delete,
}

/// Render whichever modal is open: the confirmation first, else the form.
pub fn show_dialogs(app: &mut TimelineApp, ctx: &Context) {
    let palette = theme::palette(app.settings.theme);

    if let Some(confirm) = app.confirm.take() {
        match show_confirm(&confirm, palette, ctx) {
            Some(true) => app.confirmed(confirm),
            Some(false) => {}
            None => app.confirm = Some(confirm),
        }
        return;
    }

    let Some(mut dialog) = app.dialog.take() else {
        return;
    };
    let projects: &[Project] = app.board.as_ref().map(|b| b.projects()).unwrap_or(&[]);
    let choice = match &mut dialog {
        Dialog::Project(form) => project_dialog(form, palette, ctx),
        Dialog::Task(form) => task_dialog(form, projects, palette, ctx),
    };

    match choice {
        Choice::Keep => app.dialog = Some(dialog),
        Choice::Cancel => {}
        Choice::Submit => app.submit_dialog(dialog),
        Choice::Delete => {
            app.confirm = match dialog {
                Dialog::Project(ProjectForm { id: Some(id), name, .. }) => {
                    Some(Confirm::DeleteProject { id, name })
                }
                Dialog::Task(TaskForm { id: Some(id), text, .. }) => {
                    Some(Confirm::DeleteTask { id, text })
                }
                _ => None,
            };
        }
    }
}

fn modal(title: String) -> Window<'static> {
    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([DIALOG_WIDTH, 0.0])
}

fn project_dialog(form: &mut ProjectForm, palette: &Palette, ctx: &Context) -> Choice {
    let title = if form.is_edit() { "Edit Project" } else { "New Project" };
    let mut choice = Choice::Keep;

    modal(title.to_string()).show(ctx, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("project_dialog_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Name").color(palette.text_secondary));
                ui.add_sized(
                    [220.0, 24.0],
                    egui::TextEdit::singleline(&mut form.name).hint_text("Project name..."),
                );
                ui.end_row();

                ui.label(RichText::new("Color").color(palette.text_secondary));
                ui.horizontal_wrapped(|ui| {
                    for scheme in COLOR_SCHEMES {
                        let selected = form.color_scheme == *scheme;
                        let swatch = RichText::new("●").size(18.0).color(theme::scheme_color(scheme));
                        if ui.selectable_label(selected, swatch).on_hover_text(*scheme).clicked() {
                            form.color_scheme = scheme.to_string();
                        }
                    }
                });
                ui.end_row();
            });

        choice = buttons(ui, form.is_edit(), palette);
    });

    escape_cancels(ctx, choice)
}

fn task_dialog(
    form: &mut TaskForm,
    projects: &[Project],
    palette: &Palette,
    ctx: &Context,
) -> Choice {
    let title = if form.is_edit() { "Edit Task" } else { "New Task" };
    let mut choice = Choice::Keep;

    modal(title.to_string()).show(ctx, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("task_dialog_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Project").color(palette.text_secondary));
                let selected = form
                    .project_id
                    .and_then(|id| projects.iter().find(|p| p.id == id))
                    .map(|p| p.name.as_str())
                    .unwrap_or("Select a project");
                egui::ComboBox::from_id_salt("task_dialog_project")
                    .width(220.0)
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for project in projects {
                            ui.selectable_value(&mut form.project_id, Some(project.id), &project.name);
                        }
                    });
                ui.end_row();

                ui.label(RichText::new("Text").color(palette.text_secondary));
                ui.add_sized(
                    [220.0, 24.0],
                    egui::TextEdit::singleline(&mut form.text).hint_text("Task text..."),
                );
                ui.end_row();

                ui.label(RichText::new("Start").color(palette.text_secondary));
                let mut start = form.start;
                ui.add(egui_extras::DatePickerButton::new(&mut start).id_salt("dlg_dp_start"));
                if start != form.start {
                    form.set_start(start);
                }
                ui.end_row();

                ui.label(RichText::new("End").color(palette.text_secondary));
                ui.add(egui_extras::DatePickerButton::new(&mut form.end).id_salt("dlg_dp_end"));
                ui.end_row();

                ui.label(RichText::new("ETP").color(palette.text_secondary));
                ui.add_sized([80.0, 24.0], egui::TextEdit::singleline(&mut form.etp));
                ui.end_row();

                ui.label(RichText::new("Comment").color(palette.text_secondary));
                ui.add_sized(
                    [220.0, 60.0],
                    egui::TextEdit::multiline(&mut form.comment).hint_text("Optional"),
                );
                ui.end_row();
            });

        if form.end < form.start {
            ui.colored_label(palette.today_line, "End date is before the start date");
        }

        choice = buttons(ui, form.is_edit(), palette);
    });

    escape_cancels(ctx, choice)
}

fn buttons(ui: &mut egui::Ui, deletable: bool, palette: &Palette) -> Choice {
    let mut choice = Choice::Keep;
    ui.add_space(6.0);
    ui.separator();
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let save = egui::Button::new(RichText::new("Save").color(Color32::WHITE))
            .fill(palette.accent)
            .rounding(egui::Rounding::same(4.0));
        if ui.add_sized([80.0, 28.0], save).clicked() {
            choice = Choice::Submit;
        }
        if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
            choice = Choice::Cancel;
        }
        if deletable {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let delete = egui::Button::new(
                    RichText::new(format!("{} Delete", icons::TRASH)).color(palette.today_line),
                );
                if ui.add(delete).clicked() {
                    choice = Choice::Delete;
                }
            });
        }
    });
    ui.add_space(2.0);
    choice
}

fn escape_cancels(ctx: &Context, choice: Choice) -> Choice {
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        Choice::Cancel
    } else {
        choice
    }
}

/// `Some(true)` to proceed, `Some(false)` to back out, `None` while open.
fn show_confirm(confirm: &Confirm, palette: &Palette, ctx: &Context) -> Option<bool> {
    let (title, message) = match confirm {
        Confirm::DeleteProject { name, .. } => (
            "Delete Project",
            format!("Delete project \"{name}\" and all of its tasks?"),
        ),
        Confirm::DeleteTask { text, .. } => ("Delete Task", format!("Delete task \"{text}\"?")),
    };
    let mut answer = None;

    modal(title.to_string()).show(ctx, |ui| {
        ui.add_space(4.0);
        ui.label(message);
        ui.label(RichText::new("This cannot be undone.").small().color(palette.text_dim));
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let delete = egui::Button::new(RichText::new("Delete").color(Color32::WHITE))
                .fill(palette.today_line);
            if ui.add_sized([80.0, 28.0], delete).clicked() {
                answer = Some(true);
            }
            if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                answer = Some(false);
            }
        });
    });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        return Some(false);
    }
    answer
}
