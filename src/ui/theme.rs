use crate::render::Rgb;
use ratatui::style::Color;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub gauge_fill: Color,     // Filled part of a control slider
    pub gauge_track: Color,    // Empty part of a control slider
    pub value: Color,          // Control values and readouts
    pub momentary: Color,      // Marker for spring-return controls
}

pub const DEFAULT_THEME: Theme = Theme {
    bg: Color::Rgb(30, 30, 46),
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for the active control
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for the active row
    gauge_fill: Color::Rgb(137, 180, 250),
    gauge_track: Color::Rgb(69, 71, 90),
    value: Color::Rgb(250, 179, 135),
    momentary: Color::Rgb(148, 226, 213), // Cyan/teal
};

/// Scene colors map straight onto 24-bit terminal colors
pub fn scene_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}
