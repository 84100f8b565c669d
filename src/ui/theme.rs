use egui::{Color32, FontId, Rounding, Stroke, Visuals};
use project_timeline::notify::NotificationKind;
use project_timeline::settings::ThemeMode;

// ── Palette ──────────────────────────────────────────────────────────────────

pub struct Palette {
    pub bg: Color32,
    pub bg_panel: Color32,
    pub bg_header: Color32,
    pub bg_row_alt: Color32,
    pub border: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_dim: Color32,
    pub accent: Color32,
    pub today_line: Color32,
    pub grid_line: Color32,
    pub field_bg: Color32,
}

const DARK: Palette = Palette {
    bg: Color32::from_rgb(24, 24, 32),
    bg_panel: Color32::from_rgb(30, 30, 40),
    bg_header: Color32::from_rgb(34, 37, 48),
    bg_row_alt: Color32::from_rgb(28, 28, 37),
    border: Color32::from_rgb(50, 52, 64),
    text_primary: Color32::from_rgb(230, 232, 240),
    text_secondary: Color32::from_rgb(155, 160, 178),
    text_dim: Color32::from_rgb(100, 105, 120),
    accent: Color32::from_rgb(80, 140, 220),
    today_line: Color32::from_rgb(240, 75, 75),
    grid_line: Color32::from_rgb(44, 46, 58),
    field_bg: Color32::from_rgb(20, 20, 28),
};

const LIGHT: Palette = Palette {
    bg: Color32::from_rgb(249, 250, 251),
    bg_panel: Color32::from_rgb(255, 255, 255),
    bg_header: Color32::from_rgb(243, 244, 246),
    bg_row_alt: Color32::from_rgb(246, 247, 249),
    border: Color32::from_rgb(229, 231, 235),
    text_primary: Color32::from_rgb(17, 24, 39),
    text_secondary: Color32::from_rgb(75, 85, 99),
    text_dim: Color32::from_rgb(156, 163, 175),
    accent: Color32::from_rgb(37, 99, 235),
    today_line: Color32::from_rgb(220, 38, 38),
    grid_line: Color32::from_rgb(229, 231, 235),
    field_bg: Color32::from_rgb(255, 255, 255),
};

pub fn palette(mode: ThemeMode) -> &'static Palette {
    match mode {
        ThemeMode::Light => &LIGHT,
        ThemeMode::Dark => &DARK,
    }
}

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const HEADER_HEIGHT: f32 = 36.0;
pub const LABEL_WIDTH: f32 = 190.0;
pub const LANE_HEIGHT: f32 = 28.0;
pub const ROW_PADDING: f32 = 6.0;
pub const MIN_COLUMN_WIDTH: f32 = 70.0;
pub const BAR_ROUNDING: f32 = 5.0;
pub const BAR_INSET: f32 = 3.0;
pub const ETP_CELL_WIDTH: f32 = 84.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

// ── Task colors ──────────────────────────────────────────────────────────────

/// Resolve a color tag such as `blue-600` to RGB. Unknown tags fall back to
/// the blue of the same shade.
pub fn tag_color(tag: &str) -> Color32 {
    let (scheme, shade) = tag.split_once('-').unwrap_or((tag, "500"));
    let shades = scheme_shades(scheme).unwrap_or(BLUE);
    match shade {
        "400" => shades[0],
        "600" => shades[2],
        _ => shades[1],
    }
}

/// Swatch shown next to a scheme in the project dialog.
pub fn scheme_color(scheme: &str) -> Color32 {
    scheme_shades(scheme).unwrap_or(BLUE)[2]
}

type Shades = [Color32; 3];

const BLUE: Shades = [
    Color32::from_rgb(96, 165, 250),
    Color32::from_rgb(59, 130, 246),
    Color32::from_rgb(37, 99, 235),
];

fn scheme_shades(scheme: &str) -> Option<Shades> {
    Some(match scheme {
        "blue" => BLUE,
        "purple" => [
            Color32::from_rgb(192, 132, 252),
            Color32::from_rgb(168, 85, 247),
            Color32::from_rgb(147, 51, 234),
        ],
        "green" => [
            Color32::from_rgb(74, 222, 128),
            Color32::from_rgb(34, 197, 94),
            Color32::from_rgb(22, 163, 74),
        ],
        "yellow" => [
            Color32::from_rgb(250, 204, 21),
            Color32::from_rgb(234, 179, 8),
            Color32::from_rgb(202, 138, 4),
        ],
        "red" => [
            Color32::from_rgb(248, 113, 113),
            Color32::from_rgb(239, 68, 68),
            Color32::from_rgb(220, 38, 38),
        ],
        "indigo" => [
            Color32::from_rgb(129, 140, 248),
            Color32::from_rgb(99, 102, 241),
            Color32::from_rgb(79, 70, 229),
        ],
        "teal" => [
            Color32::from_rgb(45, 212, 191),
            Color32::from_rgb(20, 184, 166),
            Color32::from_rgb(13, 148, 136),
        ],
        "gray" => [
            Color32::from_rgb(156, 163, 175),
            Color32::from_rgb(107, 114, 128),
            Color32::from_rgb(75, 85, 99),
        ],
        _ => return None,
    })
}

pub fn notification_color(kind: NotificationKind) -> Color32 {
    match kind {
        NotificationKind::Info => Color32::from_rgb(59, 130, 246),
        NotificationKind::Success => Color32::from_rgb(22, 163, 74),
        NotificationKind::Warning => Color32::from_rgb(217, 119, 6),
        NotificationKind::Error => Color32::from_rgb(220, 38, 38),
    }
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context, mode: ThemeMode) {
    let p = palette(mode);
    let mut visuals = if mode.is_dark() {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    visuals.override_text_color = Some(p.text_primary);
    visuals.panel_fill = p.bg_panel;
    visuals.window_fill = p.bg_panel;
    visuals.extreme_bg_color = p.field_bg;
    visuals.faint_bg_color = p.bg_row_alt;

    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, p.border);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, p.text_secondary);
    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, p.accent);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, p.accent);

    visuals.selection.bg_fill = p.accent.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, p.accent);

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, p.border);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}
