//! Vecnote Render Library
//!
//! Turns canvas state into a backend-agnostic list of draw operations and
//! defines the trait rendering backends implement.

mod frame;
mod renderer;

pub use frame::{DrawOp, Frame, build_frame, parse_css_color};
pub use renderer::{FrameRecorder, RenderConfig, RenderContext, RenderResult, Renderer, RendererError};
