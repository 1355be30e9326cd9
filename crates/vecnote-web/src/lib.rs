//! Vecnote Web
//!
//! Browser host for the Vecnote canvas: note session management, Canvas 2D
//! rendering, DOM pointer wiring and local storage persistence.

pub mod config;
pub mod error;
pub mod session;
pub mod style;

pub use config::WebConfig;
pub use error::{WebError, WebResult};
pub use session::{HostEffect, NoteSession};

#[cfg(target_arch = "wasm32")]
mod canvas2d;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2dRenderer;
#[cfg(target_arch = "wasm32")]
pub use host::WebCanvas;
#[cfg(target_arch = "wasm32")]
pub use web::{VecnoteApp, mount, run_wasm};
