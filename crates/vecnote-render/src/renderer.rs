//! Renderer trait abstraction.

use crate::frame::{Frame, build_frame};
use kurbo::Size;
use peniko::Color;
use thiserror::Error;
use vecnote_core::{Overlay, Stroke};

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Colors and line styles for overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Fill after clearing; `None` leaves the surface transparent.
    pub background: Option<Color>,
    pub lasso_color: Color,
    pub lasso_width: f64,
    pub selection_color: Color,
    pub selection_width: f64,
    /// Margin around the selection outline.
    pub selection_padding: f64,
    /// On/off lengths for dashed overlays.
    pub dash_pattern: [f64; 2],
}

impl Default for RenderConfig {
    fn default() -> Self {
        let highlight = Color::from_rgba8(0x00, 0xBF, 0xFF, 0xFF);
        Self {
            background: None,
            lasso_color: highlight,
            lasso_width: 2.0,
            selection_color: highlight,
            selection_width: 1.0,
            selection_padding: 5.0,
            dash_pattern: [5.0, 5.0],
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Committed strokes.
    pub strokes: &'a [Stroke],
    /// In-progress pen stroke or lasso.
    pub overlay: Overlay<'a>,
    /// CSS color of the pen stroke being drawn.
    pub live_color: &'a str,
    /// Width of the pen stroke being drawn.
    pub live_width: f64,
    /// Surface size in pixels.
    pub viewport_size: Size,
    pub config: RenderConfig,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with no overlay.
    pub fn new(strokes: &'a [Stroke], viewport_size: Size) -> Self {
        Self {
            strokes,
            overlay: Overlay::None,
            live_color: vecnote_core::tools::DEFAULT_COLOR,
            live_width: vecnote_core::tools::DEFAULT_WIDTH,
            viewport_size,
            config: RenderConfig::default(),
        }
    }

    /// Set the in-progress overlay.
    pub fn with_overlay(mut self, overlay: Overlay<'a>) -> Self {
        self.overlay = overlay;
        self
    }

    /// Set the color and width used for the live pen stroke.
    pub fn with_live_style(mut self, color: &'a str, width: f64) -> Self {
        self.live_color = color;
        self.live_width = width;
        self
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Draw one prepared frame.
    fn draw_frame(&mut self, frame: &Frame) -> RenderResult<()>;

    /// Run the rendering pass for `ctx`.
    ///
    /// Safe to call any number of times; each call redraws from scratch.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let frame = build_frame(ctx);
        self.draw_frame(&frame)
    }
}

/// Renderer that keeps the frames it is given. Useful headless and in tests.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl Renderer for FrameRecorder {
    fn draw_frame(&mut self, frame: &Frame) -> RenderResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
