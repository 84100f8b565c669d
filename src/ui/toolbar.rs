use crate::app::{TimelineApp, View};
use crate::ui::theme;
use egui::{RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top toolbar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    let palette = theme::palette(app.settings.theme);

    ui.horizontal(|ui| {
        // View tabs; the active one is highlighted.
        for (view, icon, label) in [
            (View::Timeline, icons::CALENDAR_BLANK, "Timeline"),
            (View::Etp, icons::TABLE, "ETP"),
        ] {
            let text = RichText::new(format!("{icon} {label}")).font(theme::font_header());
            if ui.selectable_label(app.view == view, text).clicked() {
                app.set_view(view);
            }
        }

        ui.separator();

        if ui
            .button(icons::CARET_LEFT)
            .on_hover_text(format!("Previous {}", app.granularity().label().to_lowercase()))
            .clicked()
        {
            app.pan(-1);
        }
        ui.label(
            RichText::new(format!(
                "{} – {}",
                app.range.start.format("%d %b %Y"),
                app.range.end.format("%d %b %Y")
            ))
            .color(palette.text_secondary),
        );
        if ui
            .button(icons::CARET_RIGHT)
            .on_hover_text(format!("Next {}", app.granularity().label().to_lowercase()))
            .clicked()
        {
            app.pan(1);
        }

        let next = app.granularity().toggled();
        if ui
            .button(app.granularity().label())
            .on_hover_text(format!("Switch to {} columns", next.label().to_lowercase()))
            .clicked()
        {
            app.toggle_granularity();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let theme_icon = if app.settings.theme.is_dark() {
                icons::SUN
            } else {
                icons::MOON
            };
            if ui.button(theme_icon).on_hover_text("Toggle theme").clicked() {
                app.toggle_theme();
            }

            if app.is_local()
                && ui
                    .button(icons::FOLDER_OPEN)
                    .on_hover_text("Open data folder")
                    .clicked()
            {
                app.open_data_folder();
            }
            if ui
                .button(icons::ARROWS_CLOCKWISE)
                .on_hover_text("Reload projects")
                .clicked()
            {
                app.refresh();
            }
            if ui
                .button(icons::DOWNLOAD_SIMPLE)
                .on_hover_text("Export ETP sheet to CSV")
                .clicked()
            {
                app.export_etp();
            }
            if ui
                .button(icons::UPLOAD_SIMPLE)
                .on_hover_text("Import tasks from CSV")
                .clicked()
            {
                app.import_csv();
            }

            ui.separator();

            let has_projects = app.board.as_ref().is_some_and(|b| !b.projects().is_empty());
            if ui
                .add_enabled(has_projects, egui::Button::new(format!("{} New Task", icons::PLUS)))
                .clicked()
            {
                app.new_task(None);
            }
            let new_project = egui::Button::new(
                RichText::new(format!("{} New Project", icons::PLUS)).color(egui::Color32::WHITE),
            )
            .fill(palette.accent);
            if ui.add_enabled(app.board.is_some(), new_project).clicked() {
                app.new_project();
            }
        });
    });
}
