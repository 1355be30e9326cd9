//! Canvas 2D rendering backend.

use crate::style::{css_rgba, line_cap, line_join};
use kurbo::{BezPath, PathEl, Stroke as StrokeStyle};
use peniko::Color;
use vecnote_render::{DrawOp, Frame, RenderResult, Renderer, RendererError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Draws frames onto a `<canvas>` through its 2D context.
pub struct Canvas2dRenderer {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> RenderResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| RendererError::InitFailed(format!("{:?}", e)))?
            .ok_or_else(|| RendererError::InitFailed("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RendererError::InitFailed("unexpected context type".to_string()))?;
        Ok(Self { ctx })
    }

    fn trace_path(&self, path: &BezPath) {
        self.ctx.begin_path();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                PathEl::ClosePath => self.ctx.close_path(),
            }
        }
    }

    fn apply_style(&self, color: Color, style: &StrokeStyle) -> RenderResult<()> {
        self.ctx.set_stroke_style_str(&css_rgba(color));
        self.ctx.set_line_width(style.width);
        self.ctx.set_line_cap(line_cap(style.start_cap));
        self.ctx.set_line_join(line_join(style.join));
        self.set_dashes(&style.dash_pattern)
    }

    fn set_dashes(&self, pattern: &[f64]) -> RenderResult<()> {
        let dashes = js_sys::Array::new();
        for &d in pattern {
            dashes.push(&JsValue::from_f64(d));
        }
        self.ctx
            .set_line_dash(&dashes)
            .map_err(|e| RendererError::RenderFailed(format!("setLineDash: {:?}", e)))
    }
}

impl Renderer for Canvas2dRenderer {
    fn draw_frame(&mut self, frame: &Frame) -> RenderResult<()> {
        for op in &frame.ops {
            match op {
                DrawOp::Clear(size) => self.ctx.clear_rect(0.0, 0.0, size.width, size.height),
                DrawOp::Fill(size, color) => {
                    self.ctx.set_fill_style_str(&css_rgba(*color));
                    self.ctx.fill_rect(0.0, 0.0, size.width, size.height);
                }
                DrawOp::Path { path, color, style } => {
                    self.trace_path(path);
                    self.apply_style(*color, style)?;
                    self.ctx.stroke();
                }
                DrawOp::Rect { rect, color, style } => {
                    self.apply_style(*color, style)?;
                    self.ctx.stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
                }
            }
        }
        self.set_dashes(&[])
    }
}
