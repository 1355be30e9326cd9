//! Stroke canvas engine: turns pointer events into stroke list changes and
//! pan requests.
//!
//! The engine never owns the committed strokes. Each call receives the
//! host's current [`CanvasProps`] and answers with [`EngineCommand`]s; a
//! changed stroke list is always a complete replacement.

use crate::config::EngineConfig;
use crate::geometry::stroke_in_lasso;
use crate::gesture::{ClassifyContext, Gesture, GestureKind, classify_pointer_down};
use crate::inertia::{CancellationToken, InertialScroller};
use crate::input::{ActivePointers, PointerEvent, PointerSample};
use crate::stroke::{Point, Stroke, deselect_all, next_stroke_id};
use crate::tools::{ToolKind, ToolSettings};
use kurbo::Vec2;

/// Host-owned inputs for one event.
#[derive(Debug, Clone, Copy)]
pub struct CanvasProps<'a> {
    /// Committed strokes of the active tab.
    pub strokes: &'a [Stroke],
    pub tool: ToolKind,
    /// CSS color for a new stroke.
    pub color: &'a str,
    /// Width for a new stroke.
    pub width: f64,
    /// Virtual canvas height in pixels.
    ///
    /// The engine works in canvas-local coordinates and never reads this;
    /// it travels with the props so hosts can size the surface and decide
    /// when to grow it.
    pub height: f64,
    pub finger_drawing_enabled: bool,
}

impl<'a> CanvasProps<'a> {
    /// Build props from the host's tool settings.
    pub fn new(strokes: &'a [Stroke], settings: &'a ToolSettings, height: f64) -> Self {
        Self {
            strokes,
            tool: settings.tool,
            color: &settings.color,
            width: settings.width,
            height,
            finger_drawing_enabled: settings.finger_drawing_enabled,
        }
    }
}

/// Requests from the engine to its host.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Replace the stroke list with this one.
    StrokesChanged(Vec<Stroke>),
    /// Scroll the viewport by this many pixels (positive scrolls down).
    Pan(f64),
    /// Start calling [`StrokeEngine::tick_frame`] once per display frame
    /// until the token is cancelled.
    ScheduleInertia(CancellationToken),
}

/// In-progress drawing to show on top of the committed strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlay<'a> {
    None,
    /// Pen stroke being drawn, in the live color and width.
    Pen(&'a [Point]),
    /// Lasso path being captured.
    Lasso(&'a [Point]),
}

/// The interaction engine for one canvas.
#[derive(Debug, Clone, Default)]
pub struct StrokeEngine {
    config: EngineConfig,
    gesture: Gesture,
    pointers: ActivePointers,
    inertia: InertialScroller,
}

impl StrokeEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            inertia: InertialScroller::new(&config),
            config,
            gesture: Gesture::Idle,
            pointers: ActivePointers::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Whether an inertial scroll is running.
    pub fn is_animating(&self) -> bool {
        self.inertia.is_running()
    }

    /// In-progress drawing for the render pass.
    pub fn overlay(&self) -> Overlay<'_> {
        match &self.gesture {
            Gesture::Drawing {
                tool: ToolKind::Pen,
                points,
                ..
            } => Overlay::Pen(points),
            Gesture::Drawing {
                tool: ToolKind::Lasso,
                points,
                ..
            } => Overlay::Lasso(points),
            _ => Overlay::None,
        }
    }

    /// Drop all transient state, e.g. when the host switches tabs.
    pub fn reset(&mut self) {
        self.inertia.cancel();
        self.pointers.clear();
        self.gesture = Gesture::Idle;
    }

    /// Process one pointer event.
    pub fn handle_event(&mut self, event: &PointerEvent, props: &CanvasProps<'_>) -> Vec<EngineCommand> {
        match event {
            PointerEvent::Down(sample) => {
                self.pointers.press(sample.pointer_id);
                self.pointer_down(sample, props);
                Vec::new()
            }
            PointerEvent::Move(sample) => self.pointer_move(sample, props),
            PointerEvent::Up(sample) | PointerEvent::Cancel(sample) => {
                self.pointers.release(sample.pointer_id);
                self.pointer_up(sample, props)
            }
        }
    }

    /// Advance the inertial scroll by one frame.
    pub fn tick_frame(&mut self) -> Option<EngineCommand> {
        self.inertia.tick().map(EngineCommand::Pan)
    }

    fn pointer_down(&mut self, sample: &PointerSample, props: &CanvasProps<'_>) {
        if !self.gesture.is_idle() {
            // A second finger aborts a pan; anything else waits for the
            // current gesture to finish.
            if matches!(self.gesture, Gesture::Panning { .. }) && sample.is_touch() {
                log::debug!("pan aborted by pointer {}", sample.pointer_id);
                self.gesture = Gesture::Idle;
            }
            return;
        }

        let ctx = ClassifyContext {
            tool: props.tool,
            finger_drawing_enabled: props.finger_drawing_enabled,
            active_pointers: self.pointers.count(),
            strokes: props.strokes,
            selection_padding: self.config.selection_padding,
        };
        let Some(kind) = classify_pointer_down(sample, &ctx) else {
            return;
        };

        self.gesture = match kind {
            GestureKind::Pan => {
                self.inertia.cancel();
                Gesture::Panning {
                    pointer_id: sample.pointer_id,
                    last_y: sample.client_y,
                    last_time_ms: sample.timestamp_ms,
                    velocity: 0.0,
                }
            }
            GestureKind::Move => Gesture::Moving {
                pointer_id: sample.pointer_id,
                anchor: sample.position,
            },
            GestureKind::Draw => Gesture::Drawing {
                pointer_id: sample.pointer_id,
                tool: props.tool,
                points: vec![sample.position],
            },
        };
        log::debug!("gesture start: {} (pointer {})", self.gesture.name(), sample.pointer_id);
    }

    fn pointer_move(&mut self, sample: &PointerSample, props: &CanvasProps<'_>) -> Vec<EngineCommand> {
        if self.gesture.pointer_id() != Some(sample.pointer_id) {
            return Vec::new();
        }
        if matches!(self.gesture, Gesture::Panning { .. }) && self.pointers.count() > 1 {
            log::debug!("pan aborted: multiple pointers active");
            self.gesture = Gesture::Idle;
            return Vec::new();
        }

        match &mut self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Drawing { points, .. } => {
                points.push(sample.position);
                Vec::new()
            }
            Gesture::Moving { anchor, .. } => {
                let delta = Vec2::new(sample.position.x - anchor.x, sample.position.y - anchor.y);
                if delta == Vec2::ZERO {
                    return Vec::new();
                }
                *anchor = sample.position;
                let moved = props
                    .strokes
                    .iter()
                    .map(|s| if s.selected { s.translated(delta) } else { s.clone() })
                    .collect();
                vec![EngineCommand::StrokesChanged(moved)]
            }
            Gesture::Panning {
                last_y,
                last_time_ms,
                velocity,
                ..
            } => {
                let dy = *last_y - sample.client_y;
                let pan = dy * self.config.pan_friction;
                let elapsed = sample.timestamp_ms - *last_time_ms;
                if elapsed > 0.0 {
                    let smoothing = self.config.velocity_smoothing;
                    *velocity = *velocity * smoothing + (pan / elapsed) * (1.0 - smoothing);
                }
                *last_y = sample.client_y;
                *last_time_ms = sample.timestamp_ms;

                if pan == 0.0 {
                    Vec::new()
                } else {
                    vec![EngineCommand::Pan(pan)]
                }
            }
        }
    }

    fn pointer_up(&mut self, sample: &PointerSample, props: &CanvasProps<'_>) -> Vec<EngineCommand> {
        if self.gesture.pointer_id() != Some(sample.pointer_id) {
            return Vec::new();
        }

        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Moving { .. } => Vec::new(),
            Gesture::Drawing {
                tool: ToolKind::Pen,
                points,
                ..
            } => self.commit_stroke(points, props).into_iter().collect(),
            Gesture::Drawing {
                tool: ToolKind::Lasso,
                points,
                ..
            } => self.commit_lasso(&points, props).into_iter().collect(),
            Gesture::Panning { velocity, .. } => self
                .inertia
                .start(velocity)
                .map(EngineCommand::ScheduleInertia)
                .into_iter()
                .collect(),
        }
    }

    fn commit_stroke(&self, points: Vec<Point>, props: &CanvasProps<'_>) -> Option<EngineCommand> {
        if points.len() < self.config.min_stroke_points {
            log::trace!("discarding pen gesture with {} point(s)", points.len());
            return None;
        }
        let stroke = Stroke::new(next_stroke_id(), points, props.color, props.width);
        log::debug!("commit stroke {} ({} points)", stroke.id, stroke.points.len());

        let mut strokes = deselect_all(props.strokes);
        strokes.push(stroke);
        Some(EngineCommand::StrokesChanged(strokes))
    }

    fn commit_lasso(&self, lasso: &[Point], props: &CanvasProps<'_>) -> Option<EngineCommand> {
        if lasso.len() < self.config.min_lasso_points {
            log::trace!("discarding lasso with {} point(s)", lasso.len());
            return None;
        }
        let strokes: Vec<Stroke> = props
            .strokes
            .iter()
            .map(|s| s.with_selected(stroke_in_lasso(s, lasso)))
            .collect();
        log::debug!(
            "lasso selected {} of {} strokes",
            strokes.iter().filter(|s| s.selected).count(),
            strokes.len()
        );
        Some(EngineCommand::StrokesChanged(strokes))
    }
}
