//! The rendering pass: canvas state in, draw operations out.

use crate::renderer::RenderContext;
use kurbo::{BezPath, Cap, Join, Rect, Size, Stroke as StrokeStyle};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use vecnote_core::stroke::polyline;
use vecnote_core::{Overlay, Point, selection_bounds};

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Clear the whole surface.
    Clear(Size),
    /// Fill the whole surface.
    Fill(Size, Color),
    /// Stroke an open path.
    Path {
        path: BezPath,
        color: Color,
        style: StrokeStyle,
    },
    /// Stroke a rectangle outline.
    Rect {
        rect: Rect,
        color: Color,
        style: StrokeStyle,
    },
}

/// Draw operations for one frame, in painter's order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub ops: Vec<DrawOp>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Parse a CSS color, falling back to white.
///
/// Runs once per stroke on every frame, so failures stay at `debug`.
pub fn parse_css_color(css: &str) -> Color {
    match parse_color(css) {
        Ok(color) => color.to_alpha_color::<Srgb>(),
        Err(e) => {
            log::debug!("Unparseable stroke color {css:?}: {e}");
            Color::WHITE
        }
    }
}

fn round_style(width: f64) -> StrokeStyle {
    StrokeStyle::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

fn polyline_op(points: &[Point], color: Color, style: StrokeStyle) -> Option<DrawOp> {
    (points.len() >= 2).then(|| DrawOp::Path {
        path: polyline(points),
        color,
        style,
    })
}

/// Build the frame for the current canvas state.
///
/// Committed strokes first, then the pen or lasso overlay, then the
/// selection outline.
pub fn build_frame(ctx: &RenderContext) -> Frame {
    let config = &ctx.config;
    let mut ops = vec![DrawOp::Clear(ctx.viewport_size)];
    if let Some(background) = config.background {
        ops.push(DrawOp::Fill(ctx.viewport_size, background));
    }

    ops.extend(ctx.strokes.iter().filter_map(|stroke| {
        polyline_op(&stroke.points, parse_css_color(&stroke.color), round_style(stroke.width))
    }));

    match ctx.overlay {
        Overlay::None => {}
        Overlay::Pen(points) => {
            ops.extend(polyline_op(
                points,
                parse_css_color(ctx.live_color),
                round_style(ctx.live_width),
            ));
        }
        Overlay::Lasso(points) => {
            let style = round_style(config.lasso_width).with_dashes(0.0, config.dash_pattern);
            ops.extend(polyline_op(points, config.lasso_color, style));
        }
    }

    if let Some(bounds) = selection_bounds(ctx.strokes) {
        ops.push(DrawOp::Rect {
            rect: bounds.padded(config.selection_padding).to_rect(),
            color: config.selection_color,
            style: StrokeStyle::new(config.selection_width).with_dashes(0.0, config.dash_pattern),
        });
    }

    Frame { ops }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderConfig;
    use vecnote_core::Stroke;

    fn stroke(id: &str, points: &[(f64, f64)], color: &str, selected: bool) -> Stroke {
        let mut s = Stroke::new(id, points.iter().map(|&(x, y)| Point::new(x, y)).collect(), color, 4.0);
        s.selected = selected;
        s
    }

    fn ctx(strokes: &[Stroke]) -> RenderContext<'_> {
        RenderContext::new(strokes, Size::new(800.0, 2000.0))
    }

    #[test]
    fn test_empty_canvas_only_clears() {
        let frame = build_frame(&ctx(&[]));
        assert_eq!(frame.ops, vec![DrawOp::Clear(Size::new(800.0, 2000.0))]);
    }

    #[test]
    fn test_strokes_use_round_caps_and_own_style() {
        let strokes = vec![stroke("a", &[(0.0, 0.0), (10.0, 10.0)], "#FF0000", false)];
        let frame = build_frame(&ctx(&strokes));
        assert_eq!(frame.len(), 2);
        match &frame.ops[1] {
            DrawOp::Path { path, color, style } => {
                assert_eq!(path.elements().len(), 2);
                assert_eq!(color.to_rgba8().r, 0xFF);
                assert_eq!(color.to_rgba8().g, 0);
                assert_eq!(style.width, 4.0);
                assert_eq!(style.join, Join::Round);
                assert_eq!(style.start_cap, Cap::Round);
                assert!(style.dash_pattern.is_empty());
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_single_point_strokes_are_skipped() {
        let strokes = vec![stroke("dot", &[(1.0, 1.0)], "#FFFFFF", false)];
        assert_eq!(build_frame(&ctx(&strokes)).len(), 1);
    }

    #[test]
    fn test_pen_overlay_uses_live_style() {
        let points = [Point::new(0.0, 0.0), Point::new(3.0, 3.0)];
        let context = ctx(&[])
            .with_overlay(Overlay::Pen(&points))
            .with_live_style("#00FF00", 12.0);
        let frame = build_frame(&context);
        match frame.ops.last() {
            Some(DrawOp::Path { color, style, .. }) => {
                assert_eq!(color.to_rgba8().g, 0xFF);
                assert_eq!(style.width, 12.0);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_lasso_overlay_is_dashed() {
        let points = [Point::new(0.0, 0.0), Point::new(3.0, 3.0), Point::new(0.0, 6.0)];
        let frame = build_frame(&ctx(&[]).with_overlay(Overlay::Lasso(&points)));
        match frame.ops.last() {
            Some(DrawOp::Path { style, color, .. }) => {
                assert_eq!(style.width, 2.0);
                assert_eq!(style.dash_pattern.as_slice(), &[5.0, 5.0]);
                assert_eq!(*color, RenderConfig::default().lasso_color);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_selection_outline_is_padded_union() {
        let strokes = vec![
            stroke("a", &[(0.0, 0.0), (10.0, 10.0)], "#FFFFFF", true),
            stroke("b", &[(20.0, 5.0), (30.0, 40.0)], "#FFFFFF", true),
            stroke("c", &[(100.0, 100.0), (200.0, 200.0)], "#FFFFFF", false),
        ];
        let frame = build_frame(&ctx(&strokes));
        match frame.ops.last() {
            Some(DrawOp::Rect { rect, style, .. }) => {
                assert_eq!(*rect, Rect::new(-5.0, -5.0, 35.0, 45.0));
                assert_eq!(style.width, 1.0);
                assert!(!style.dash_pattern.is_empty());
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_background_fill() {
        let config = RenderConfig {
            background: Some(Color::from_rgba8(0x11, 0x18, 0x27, 0xFF)),
            ..RenderConfig::default()
        };
        let frame = build_frame(&ctx(&[]).with_config(config));
        assert!(matches!(frame.ops[1], DrawOp::Fill(_, _)));
    }

    #[test]
    fn test_default_overlay_colors() {
        let config = RenderConfig::default();
        assert_eq!(config.lasso_color.to_rgba8(), parse_css_color("#00BFFF").to_rgba8());
        assert_eq!(config.selection_color, config.lasso_color);
        assert_eq!(config.dash_pattern, [5.0, 5.0]);
        assert!(config.background.is_none());
    }

    #[test]
    fn test_bad_stroke_color_renders_white_every_frame() {
        let strokes = vec![stroke("a", &[(0.0, 0.0), (5.0, 5.0)], "not-a-color", false)];
        let context = ctx(&strokes);
        for _ in 0..3 {
            match &build_frame(&context).ops[1] {
                DrawOp::Path { color, .. } => assert_eq!(*color, Color::WHITE),
                other => panic!("unexpected op {other:?}"),
            }
        }
    }

    #[test]
    fn test_bad_color_falls_back_to_white() {
        let white = parse_css_color("definitely-not-a-color");
        assert_eq!(white.to_rgba8().r, 0xFF);
        assert_eq!(parse_css_color("#00BFFF").to_rgba8().g, 0xBF);
    }
}
