//! Vecnote Core Library
//!
//! Platform-agnostic stroke model, pointer gesture engine and note storage
//! for the Vecnote canvas.

pub mod config;
pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod inertia;
pub mod input;
pub mod notes;
pub mod storage;
pub mod stroke;
pub mod tools;

pub use config::EngineConfig;
pub use engine::{CanvasProps, EngineCommand, Overlay, StrokeEngine};
pub use geometry::{BoundingBox, bounding_box, point_in_polygon, selection_bounds, stroke_in_lasso};
pub use gesture::{Gesture, GestureKind, classify_pointer_down};
pub use inertia::{CancellationToken, InertialScroller};
pub use input::{PointerEvent, PointerId, PointerSample, PointerType};
pub use notes::{FileSystem, NoteFile, Tab};
pub use stroke::{Point, Stroke, StrokeId};
pub use tools::{ToolKind, ToolSettings};
