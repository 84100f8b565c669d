use std::collections::HashSet;

use egui::{Align2, Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use egui_phosphor::regular as icons;

use project_timeline::layout::{layout_row, normalize, RowLayout, TimeAxis};
use project_timeline::model::{Granularity, Project, ProjectId, Task, TaskId, VisibleRange};
use project_timeline::LayoutError;

use crate::ui::theme::{self, Palette};

/// What the user asked for by clicking in the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineAction {
    EditTask(TaskId),
    EditProject(ProjectId),
    AddTask(ProjectId),
    ToggleProject(ProjectId),
}

struct Row<'a> {
    project: &'a Project,
    layout: Result<RowLayout, LayoutError>,
    top: f32,
    height: f32,
}

/// Render the project rows over the visible range.
pub fn show_timeline(
    projects: &[Project],
    hidden: &HashSet<ProjectId>,
    range: &VisibleRange,
    granularity: Granularity,
    palette: &Palette,
    ui: &mut Ui,
) -> Option<TimelineAction> {
    let mut action = None;

    // Visibility toggles
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new("Projects").color(palette.text_secondary));
        for project in projects {
            let visible = !hidden.contains(&project.id);
            let icon = if visible { icons::EYE } else { icons::EYE_SLASH };
            let text = egui::RichText::new(format!("{icon} {}", project.name))
                .color(if visible { theme::scheme_color(&project.color_scheme) } else { palette.text_dim });
            if ui.selectable_label(visible, text).clicked() {
                action = Some(TimelineAction::ToggleProject(project.id));
            }
        }
    });
    ui.add_space(6.0);

    let axis = match TimeAxis::build(range, granularity) {
        Ok(axis) => axis,
        Err(e) => {
            ui.colored_label(palette.today_line, e.to_string());
            return action;
        }
    };

    let mut rows = Vec::new();
    let mut y = theme::HEADER_HEIGHT;
    for project in projects.iter().filter(|p| !hidden.contains(&p.id)) {
        let layout = layout_row(&project.tasks, range);
        let lanes = layout.as_ref().map(|l| l.lane_count).unwrap_or(0).max(1);
        let height = lanes as f32 * theme::LANE_HEIGHT + theme::ROW_PADDING;
        rows.push(Row {
            project,
            layout,
            top: y,
            height,
        });
        y += height;
    }
    let content_height = y;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let available = ui.available_size();
            let grid_width = (available.x - theme::LABEL_WIDTH)
                .max(axis.len() as f32 * theme::MIN_COLUMN_WIDTH);
            let (response, painter) = ui.allocate_painter(
                Vec2::new(theme::LABEL_WIDTH + grid_width, content_height.max(available.y)),
                Sense::hover(),
            );
            let origin = response.rect.min;
            let grid = Rect::from_min_max(
                Pos2::new(origin.x + theme::LABEL_WIDTH, origin.y),
                Pos2::new(origin.x + theme::LABEL_WIDTH + grid_width, origin.y + content_height),
            );
            let x_of = |fraction: f64| grid.left() + fraction as f32 * grid.width();

            painter.rect_filled(response.rect, 0.0, palette.bg);

            for (i, row) in rows.iter().enumerate() {
                let top = origin.y + row.top;
                let row_rect = Rect::from_min_size(
                    Pos2::new(origin.x, top),
                    Vec2::new(response.rect.width(), row.height),
                );
                if i % 2 == 1 {
                    painter.rect_filled(row_rect, 0.0, palette.bg_row_alt);
                }
                painter.line_segment(
                    [row_rect.left_bottom(), row_rect.right_bottom()],
                    Stroke::new(0.5, palette.border),
                );
                if let Some(a) = draw_row_label(ui, &painter, row, row_rect, palette) {
                    action = Some(a);
                }
            }

            draw_header(&painter, origin, grid, &axis, range, palette);

            let clipped = painter.with_clip_rect(grid);
            for row in &rows {
                let top = origin.y + row.top + theme::ROW_PADDING / 2.0;
                let layout = match &row.layout {
                    Ok(layout) => layout,
                    Err(e) => {
                        clipped.text(
                            Pos2::new(grid.left() + 6.0, top + theme::LANE_HEIGHT / 2.0),
                            Align2::LEFT_CENTER,
                            e.to_string(),
                            theme::font_bar(),
                            palette.today_line,
                        );
                        continue;
                    }
                };
                for (task, placement) in row.project.tasks.iter().zip(&layout.placements) {
                    if placement.right() <= 0.0 || placement.left >= 1.0 {
                        continue;
                    }
                    let y = top + placement.lane as f32 * theme::LANE_HEIGHT;
                    let x0 = x_of(placement.left);
                    let x1 = x_of(placement.right()).max(x0 + 4.0);
                    let bar = Rect::from_min_max(
                        Pos2::new(x0, y + theme::BAR_INSET),
                        Pos2::new(x1, y + theme::LANE_HEIGHT - theme::BAR_INSET),
                    );
                    let color = task
                        .color
                        .as_deref()
                        .map(theme::tag_color)
                        .unwrap_or_else(|| theme::scheme_color(&row.project.color_scheme));
                    draw_task_bar(&clipped, bar, task, color);

                    let hit = bar.intersect(grid);
                    let response = ui
                        .interact(hit, ui.make_persistent_id(("task-bar", task.id)), Sense::click())
                        .on_hover_cursor(egui::CursorIcon::PointingHand);
                    if response.hovered() {
                        painter.rect_stroke(hit.expand(1.0), Rounding::same(theme::BAR_ROUNDING), Stroke::new(1.5, palette.accent));
                    }
                    let response = response.on_hover_ui(|ui| task_tooltip(ui, task));
                    if response.clicked() {
                        action = Some(TimelineAction::EditTask(task.id));
                    }
                }
            }

            draw_today_line(&painter, grid, range, palette, x_of);
        });

    action
}

fn draw_row_label(
    ui: &Ui,
    painter: &egui::Painter,
    row: &Row<'_>,
    row_rect: Rect,
    palette: &Palette,
) -> Option<TimelineAction> {
    let mut action = None;
    let project = row.project;
    let label_rect = Rect::from_min_size(row_rect.min, Vec2::new(theme::LABEL_WIDTH, row.height));
    let add_rect = Rect::from_center_size(
        Pos2::new(label_rect.right() - 14.0, label_rect.top() + theme::LANE_HEIGHT / 2.0 + 2.0),
        Vec2::splat(18.0),
    );

    painter.rect_filled(
        Rect::from_min_size(label_rect.min, Vec2::new(4.0, label_rect.height())),
        0.0,
        theme::scheme_color(&project.color_scheme),
    );
    let name = painter.with_clip_rect(label_rect.shrink2(Vec2::new(0.0, 1.0)).with_max_x(add_rect.left() - 2.0));
    name.text(
        Pos2::new(label_rect.left() + 12.0, label_rect.top() + theme::LANE_HEIGHT / 2.0 + 2.0),
        Align2::LEFT_CENTER,
        &project.name,
        theme::font_header(),
        palette.text_primary,
    );
    painter.text(
        Pos2::new(label_rect.left() + 12.0, label_rect.top() + theme::LANE_HEIGHT + 4.0),
        Align2::LEFT_CENTER,
        format!("{} tasks", project.tasks.len()),
        theme::font_small(),
        palette.text_dim,
    );

    let add = ui.interact(add_rect, ui.make_persistent_id(("add-task", project.id)), Sense::click());
    painter.text(
        add_rect.center(),
        Align2::CENTER_CENTER,
        icons::PLUS,
        theme::font_header(),
        if add.hovered() { palette.accent } else { palette.text_dim },
    );
    if add.on_hover_text("Add a task to this project").clicked() {
        action = Some(TimelineAction::AddTask(project.id));
    }

    let name_hit = label_rect.with_max_x(add_rect.left() - 2.0);
    let edit = ui
        .interact(name_hit, ui.make_persistent_id(("project-label", project.id)), Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if edit.on_hover_text("Edit project").clicked() {
        action = Some(TimelineAction::EditProject(project.id));
    }

    painter.line_segment(
        [label_rect.right_top(), label_rect.right_bottom()],
        Stroke::new(1.0, palette.border),
    );
    action
}

fn draw_header(
    painter: &egui::Painter,
    origin: Pos2,
    grid: Rect,
    axis: &TimeAxis,
    range: &VisibleRange,
    palette: &Palette,
) {
    let header = Rect::from_min_max(origin, Pos2::new(grid.right(), origin.y + theme::HEADER_HEIGHT));
    painter.rect_filled(header, 0.0, palette.bg_header);
    painter.line_segment(
        [header.left_bottom(), header.right_bottom()],
        Stroke::new(1.0, palette.border),
    );

    let clipped = painter.with_clip_rect(grid);
    for (i, column) in axis.columns.iter().enumerate() {
        let x = grid.left() + normalize(column.start, range) as f32 * grid.width();
        let next = axis
            .column_bounds(i)
            .map(|(_, end)| grid.left() + normalize(end, range) as f32 * grid.width())
            .unwrap_or(grid.right())
            .min(grid.right());

        clipped.line_segment(
            [Pos2::new(x, grid.top()), Pos2::new(x, grid.bottom())],
            Stroke::new(0.5, palette.grid_line),
        );
        clipped.text(
            Pos2::new((x + next) / 2.0, origin.y + theme::HEADER_HEIGHT / 2.0),
            Align2::CENTER_CENTER,
            &column.label,
            theme::font_header(),
            palette.text_primary,
        );
    }
}

fn draw_today_line(
    painter: &egui::Painter,
    grid: Rect,
    range: &VisibleRange,
    palette: &Palette,
    x_of: impl Fn(f64) -> f32,
) {
    let today = chrono::Local::now().date_naive();
    if !range.contains(today) {
        return;
    }
    let x = x_of(normalize(today, range));
    painter.line_segment(
        [Pos2::new(x, grid.top() + theme::HEADER_HEIGHT), Pos2::new(x, grid.bottom())],
        Stroke::new(1.5, palette.today_line),
    );

    let badge = Rect::from_min_size(
        Pos2::new(x - 21.0, grid.top() + theme::HEADER_HEIGHT - 1.0),
        Vec2::new(42.0, 14.0),
    );
    painter.rect_filled(badge, Rounding::same(3.0), palette.today_line);
    painter.text(
        badge.center(),
        Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_task_bar(painter: &egui::Painter, bar: Rect, task: &Task, color: Color32) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    painter.rect_filled(bar.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar, rounding, color);

    // Text on the bar, clipped to its bounds
    if bar.width() > 30.0 {
        let galley = painter.layout_no_wrap(task.text.clone(), theme::font_bar(), Color32::WHITE);
        let text_y = bar.top() + (bar.height() - galley.size().y) / 2.0;
        painter
            .with_clip_rect(bar.intersect(painter.clip_rect()))
            .galley(Pos2::new(bar.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }
}

fn task_tooltip(ui: &mut Ui, task: &Task) {
    ui.strong(&task.text);
    ui.label(task.dates_label());
    ui.label(format!("ETP: {}", project_timeline::etp::format_etp(task.effort())));
    if let Some(comment) = task.comment.as_deref().filter(|c| !c.is_empty()) {
        ui.separator();
        ui.label(comment);
    }
}
