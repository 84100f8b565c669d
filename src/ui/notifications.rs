use std::time::Instant;

use egui::{Align2, Color32, Context, RichText};

use project_timeline::notify::NotificationService;

use crate::ui::theme;

/// Stack live toasts in the bottom-right corner.
pub fn show_notifications(service: &NotificationService, now: Instant, ctx: &Context) {
    let visible = service.visible(now);
    if visible.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("notifications"))
        .anchor(Align2::RIGHT_BOTTOM, [-12.0, -32.0])
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            for toast in visible {
                let fill = theme::notification_color(toast.kind).gamma_multiply(toast.opacity);
                egui::Frame::none()
                    .fill(fill)
                    .rounding(egui::Rounding::same(6.0))
                    .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.label(
                            RichText::new(toast.message)
                                .color(Color32::WHITE.gamma_multiply(toast.opacity)),
                        );
                    });
                ui.add_space(6.0);
            }
        });
}
