use egui::Color32;

/// The fixed swatches offered by the tools panel; dark shades first, then
/// the bright primaries, then pastels.
pub const COLOR_PALETTE: [Color32; 28] = [
    Color32::from_rgb(0, 0, 0),
    Color32::from_rgb(128, 128, 128),
    Color32::from_rgb(128, 0, 0),
    Color32::from_rgb(128, 64, 0),
    Color32::from_rgb(128, 128, 0),
    Color32::from_rgb(0, 128, 0),
    Color32::from_rgb(0, 128, 128),
    Color32::from_rgb(0, 0, 128),
    Color32::from_rgb(64, 0, 128),
    Color32::from_rgb(128, 0, 128),
    Color32::from_rgb(255, 255, 255),
    Color32::from_rgb(191, 191, 191),
    Color32::from_rgb(255, 0, 0),
    Color32::from_rgb(255, 128, 0),
    Color32::from_rgb(255, 235, 4),
    Color32::from_rgb(0, 255, 0),
    Color32::from_rgb(0, 255, 255),
    Color32::from_rgb(0, 0, 255),
    Color32::from_rgb(128, 0, 255),
    Color32::from_rgb(255, 0, 255),
    Color32::from_rgb(255, 191, 204),
    Color32::from_rgb(153, 102, 51),
    Color32::from_rgb(255, 230, 153),
    Color32::from_rgb(204, 255, 204),
    Color32::from_rgb(153, 255, 255),
    Color32::from_rgb(204, 204, 255),
    Color32::from_rgb(255, 204, 255),
    Color32::from_rgb(255, 153, 153),
];

pub fn palette_color(index: usize) -> Option<Color32> {
    COLOR_PALETTE.get(index).copied()
}
