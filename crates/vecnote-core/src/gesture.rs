//! Gesture state and pointer-down routing.

use crate::geometry::selection_bounds;
use crate::input::{PointerId, PointerSample};
use crate::stroke::{Point, Stroke};
use crate::tools::ToolKind;

/// What a pointer-down starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Scroll the viewport with a finger.
    Pan,
    /// Drag the current selection.
    Move,
    /// Capture points: a pen stroke or a lasso path, depending on the tool.
    Draw,
}

/// Everything the classifier looks at besides the sample itself.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyContext<'a> {
    pub tool: ToolKind,
    pub finger_drawing_enabled: bool,
    /// Active pointers, including the one going down.
    pub active_pointers: usize,
    pub strokes: &'a [Stroke],
    pub selection_padding: f64,
}

/// Decide what a pointer-down starts.
///
/// Returns `None` for touches that should be ignored: with finger drawing
/// off, only the first concurrent touch does anything.
pub fn classify_pointer_down(sample: &PointerSample, ctx: &ClassifyContext<'_>) -> Option<GestureKind> {
    if sample.is_touch() && !ctx.finger_drawing_enabled {
        return (ctx.active_pointers == 1).then_some(GestureKind::Pan);
    }

    if ctx.tool == ToolKind::Lasso && hits_selection(sample.position, ctx.strokes, ctx.selection_padding) {
        return Some(GestureKind::Move);
    }

    Some(GestureKind::Draw)
}

/// Whether `point` falls inside the padded box around the selected strokes.
pub fn hits_selection(point: Point, strokes: &[Stroke], padding: f64) -> bool {
    selection_bounds(strokes).is_some_and(|b| b.padded(padding).contains(point))
}

/// Transient interaction state. Exactly one variant is live at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Accumulating a pen stroke or lasso path.
    Drawing {
        pointer_id: PointerId,
        tool: ToolKind,
        points: Vec<Point>,
    },
    /// Dragging the selection; `anchor` is the last applied position.
    Moving { pointer_id: PointerId, anchor: Point },
    /// Touch scrolling.
    Panning {
        pointer_id: PointerId,
        last_y: f64,
        last_time_ms: f64,
        /// Smoothed pan velocity in px/ms.
        velocity: f64,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Pointer that owns the gesture.
    pub fn pointer_id(&self) -> Option<PointerId> {
        match self {
            Gesture::Idle => None,
            Gesture::Drawing { pointer_id, .. }
            | Gesture::Moving { pointer_id, .. }
            | Gesture::Panning { pointer_id, .. } => Some(*pointer_id),
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Drawing { tool: ToolKind::Pen, .. } => "drawing",
            Gesture::Drawing { tool: ToolKind::Lasso, .. } => "lasso",
            Gesture::Moving { .. } => "moving",
            Gesture::Panning { .. } => "panning",
        }
    }
}
