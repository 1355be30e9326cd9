//! Stroke data model.

use kurbo::{BezPath, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Pressure assumed for points recorded without one.
pub const DEFAULT_PRESSURE: f64 = 0.5;

fn default_pressure() -> f64 {
    DEFAULT_PRESSURE
}

/// A canvas-local point with the pointer pressure it was captured with.
///
/// Pressure is stored for round-tripping but does not affect rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_pressure")]
    pub pressure: f64,
}

impl Point {
    /// Create a point with the default pressure.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            pressure: DEFAULT_PRESSURE,
        }
    }

    /// Create a point with an explicit pressure.
    pub fn with_pressure(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    /// Return this point shifted by `delta`, keeping its pressure.
    pub fn translate(self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            pressure: self.pressure,
        }
    }
}

impl From<Point> for kurbo::Point {
    fn from(point: Point) -> Self {
        kurbo::Point::new(point.x, point.y)
    }
}

/// Stroke identifier (`stroke-<millis>` for strokes drawn in this app).
pub type StrokeId = String;

/// A committed polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: StrokeId,
    pub points: Vec<Point>,
    /// CSS color string.
    pub color: String,
    /// Line width in pixels.
    pub width: f64,
    #[serde(default)]
    pub selected: bool,
}

impl Stroke {
    /// Create an unselected stroke.
    pub fn new(id: impl Into<StrokeId>, points: Vec<Point>, color: impl Into<String>, width: f64) -> Self {
        Self {
            id: id.into(),
            points,
            color: color.into(),
            width,
            selected: false,
        }
    }

    /// Whether the stroke has enough points to be drawn as a polyline.
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Copy of this stroke with every point shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            points: self.points.iter().map(|p| p.translate(delta)).collect(),
            ..self.clone()
        }
    }

    /// Copy of this stroke with the selection flag replaced.
    pub fn with_selected(&self, selected: bool) -> Self {
        Self {
            selected,
            ..self.clone()
        }
    }

    /// Connected polyline through all points.
    pub fn to_path(&self) -> BezPath {
        polyline(&self.points)
    }
}

/// Build an open polyline path through `points`.
pub fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(kurbo::Point::from(*first));
        for point in iter {
            path.line_to(kurbo::Point::from(*point));
        }
    }
    path
}

/// Copy of `strokes` with every selection flag cleared.
pub fn deselect_all(strokes: &[Stroke]) -> Vec<Stroke> {
    strokes.iter().map(|s| s.with_selected(false)).collect()
}

/// Whether any stroke in the list is selected.
pub fn has_selection(strokes: &[Stroke]) -> bool {
    strokes.iter().any(|s| s.selected)
}

/// Copy of `strokes` with selection cleared and the last stroke dropped.
///
/// Returns `None` when there is nothing to undo.
pub fn without_last(strokes: &[Stroke]) -> Option<Vec<Stroke>> {
    let (_, rest) = strokes.split_last()?;
    Some(deselect_all(rest))
}

static LAST_ID_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Generate a time-derived stroke id.
pub fn next_stroke_id() -> StrokeId {
    time_id("stroke")
}

/// `<prefix>-<millis>` id. Two ids made within the same millisecond get
/// consecutive values.
pub(crate) fn time_id(prefix: &str) -> String {
    format!("{prefix}-{}", unique_millis(chrono::Utc::now().timestamp_millis()))
}

fn unique_millis(now: i64) -> i64 {
    let previous = LAST_ID_MILLIS
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(previous + 1)
}
