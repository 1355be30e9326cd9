//! Conversions from render types to Canvas 2D style values.

use kurbo::{Cap, Join};
use peniko::Color;

/// CSS `rgba()` string for a color.
pub fn css_rgba(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("rgba({}, {}, {}, {})", rgba.r, rgba.g, rgba.b, f64::from(rgba.a) / 255.0)
}

pub fn line_cap(cap: Cap) -> &'static str {
    match cap {
        Cap::Butt => "butt",
        Cap::Square => "square",
        Cap::Round => "round",
    }
}

pub fn line_join(join: Join) -> &'static str {
    match join {
        Join::Bevel => "bevel",
        Join::Miter => "miter",
        Join::Round => "round",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_rgba() {
        assert_eq!(css_rgba(Color::from_rgba8(0, 191, 255, 255)), "rgba(0, 191, 255, 1)");
        assert_eq!(css_rgba(Color::from_rgba8(0, 0, 0, 0)), "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn test_line_style_names() {
        assert_eq!(line_cap(Cap::Round), "round");
        assert_eq!(line_join(Join::Miter), "miter");
    }
}
