use egui::{Color32, Visuals, style::Widgets};
use stintview::chart::Rgb;

pub(crate) mod dashboard;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);
pub(crate) const PALETTE_BROWN: Color32 = Color32::from_rgb(72, 30, 20);
pub(crate) const PALETTE_MAROON: Color32 = Color32::from_rgb(155, 57, 34);
pub(crate) const PALETTE_ORANGE: Color32 = Color32::from_rgb(242, 97, 63);

pub(crate) fn dark_visuals() -> Visuals {
    Visuals {
        dark_mode: true,
        hyperlink_color: PALETTE_MAROON,
        faint_bg_color: PALETTE_BLACK,
        extreme_bg_color: PALETTE_BROWN,
        panel_fill: PALETTE_BLACK,
        button_frame: true,
        widgets: Widgets::dark(),
        striped: true,
        ..Default::default()
    }
}

pub(crate) fn color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Same colour with the given opacity in `0.0..=1.0`.
pub(crate) fn translucent(rgb: Rgb, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0., 1.) * 255.).round() as u8;
    Color32::from_rgba_unmultiplied(rgb.r, rgb.g, rgb.b, alpha)
}
