//! Drawing tools and their live settings.

use serde::{Deserialize, Serialize};

/// Palette colors offered by the tool palette.
pub const COLORS: [&str; 7] = [
    "#FFFFFF", "#EF4444", "#F97316", "#EAB308", "#22C55E", "#3B82F6", "#A855F7",
];

/// Line widths offered by the tool palette.
pub const WIDTHS: [f64; 5] = [2.0, 3.0, 5.0, 8.0, 12.0];

/// Color used for new strokes until the user picks another.
pub const DEFAULT_COLOR: &str = "#FFFFFF";

/// Width used for new strokes until the user picks another.
pub const DEFAULT_WIDTH: f64 = 3.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Freehand strokes.
    #[default]
    Pen,
    /// Lasso selection; dragging inside the selection moves it.
    Lasso,
}

/// Live drawing parameters held by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    pub tool: ToolKind,
    /// CSS color for new strokes.
    pub color: String,
    /// Width for new strokes, in pixels.
    pub width: f64,
    /// When false, touch input pans instead of drawing.
    pub finger_drawing_enabled: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            color: DEFAULT_COLOR.to_string(),
            width: DEFAULT_WIDTH,
            finger_drawing_enabled: false,
        }
    }
}

impl ToolSettings {
    /// Create settings with the palette defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    /// Pick a color. Only palette colors are accepted.
    pub fn set_color(&mut self, color: &str) -> bool {
        if COLORS.contains(&color) {
            self.color = color.to_string();
            true
        } else {
            false
        }
    }

    /// Pick a width. Only palette widths are accepted.
    pub fn set_width(&mut self, width: f64) -> bool {
        if WIDTHS.iter().any(|w| (w - width).abs() < f64::EPSILON) {
            self.width = width;
            true
        } else {
            false
        }
    }

    pub fn toggle_finger_drawing(&mut self) {
        self.finger_drawing_enabled = !self.finger_drawing_enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ToolSettings::new();
        assert_eq!(settings.tool, ToolKind::Pen);
        assert_eq!(settings.color, "#FFFFFF");
        assert!((settings.width - 3.0).abs() < f64::EPSILON);
        assert!(!settings.finger_drawing_enabled);
    }

    #[test]
    fn test_palette_only() {
        let mut settings = ToolSettings::new();
        assert!(settings.set_color("#EF4444"));
        assert!(!settings.set_color("hotpink"));
        assert_eq!(settings.color, "#EF4444");

        assert!(settings.set_width(12.0));
        assert!(!settings.set_width(7.0));
        assert!((settings.width - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tool_switch() {
        let mut settings = ToolSettings::new();
        settings.set_tool(ToolKind::Lasso);
        assert_eq!(settings.tool, ToolKind::Lasso);
        settings.toggle_finger_drawing();
        assert!(settings.finger_drawing_enabled);
    }
}
