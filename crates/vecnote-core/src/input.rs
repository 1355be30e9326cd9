//! Pointer input for mouse, pen and touch.

use crate::stroke::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pointer identity as reported by the platform.
pub type PointerId = i32;

/// Kind of device behind a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl PointerType {
    /// Map a DOM `pointerType` string. Unknown types behave like a mouse.
    pub fn from_dom(kind: &str) -> Self {
        match kind {
            "touch" => PointerType::Touch,
            "pen" => PointerType::Pen,
            _ => PointerType::Mouse,
        }
    }
}

/// One pointer reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub pointer_id: PointerId,
    pub pointer_type: PointerType,
    /// Canvas-local position, including pressure.
    pub position: Point,
    /// Viewport y coordinate. Panning works in viewport space because the
    /// canvas itself moves while scrolling.
    pub client_y: f64,
    /// Event time in milliseconds.
    pub timestamp_ms: f64,
}

impl PointerSample {
    /// Sample whose viewport y equals its canvas y.
    pub fn new(pointer_id: PointerId, pointer_type: PointerType, position: Point, timestamp_ms: f64) -> Self {
        Self {
            pointer_id,
            pointer_type,
            position,
            client_y: position.y,
            timestamp_ms,
        }
    }

    pub fn with_client_y(mut self, client_y: f64) -> Self {
        self.client_y = client_y;
        self
    }

    pub fn is_touch(&self) -> bool {
        self.pointer_type == PointerType::Touch
    }
}

/// Pointer event type. Up and cancel end a gesture the same way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(PointerSample),
    Move(PointerSample),
    Up(PointerSample),
    Cancel(PointerSample),
}

impl PointerEvent {
    pub fn sample(&self) -> &PointerSample {
        match self {
            PointerEvent::Down(s) | PointerEvent::Move(s) | PointerEvent::Up(s) | PointerEvent::Cancel(s) => s,
        }
    }

    /// Whether this event releases its pointer.
    pub fn is_release(&self) -> bool {
        matches!(self, PointerEvent::Up(_) | PointerEvent::Cancel(_))
    }
}

/// Tracks which pointers are currently down.
#[derive(Debug, Clone, Default)]
pub struct ActivePointers {
    ids: HashSet<PointerId>,
}

impl ActivePointers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer going down. Returns false if it was already down.
    pub fn press(&mut self, id: PointerId) -> bool {
        self.ids.insert(id)
    }

    /// Record a pointer going up. Returns false if it was not down.
    pub fn release(&mut self, id: PointerId) -> bool {
        self.ids.remove(&id)
    }

    pub fn is_down(&self, id: PointerId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of concurrently active pointers.
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_type_from_dom() {
        assert_eq!(PointerType::from_dom("touch"), PointerType::Touch);
        assert_eq!(PointerType::from_dom("pen"), PointerType::Pen);
        assert_eq!(PointerType::from_dom("mouse"), PointerType::Mouse);
        assert_eq!(PointerType::from_dom(""), PointerType::Mouse);
    }

    #[test]
    fn test_active_pointers() {
        let mut pointers = ActivePointers::new();
        assert!(pointers.press(1));
        assert!(!pointers.press(1));
        assert!(pointers.press(2));
        assert_eq!(pointers.count(), 2);

        assert!(pointers.release(1));
        assert!(!pointers.release(1));
        assert!(!pointers.is_down(1));
        assert!(pointers.is_down(2));
        assert_eq!(pointers.count(), 1);
    }

    #[test]
    fn test_sample_defaults_client_y() {
        let sample = PointerSample::new(1, PointerType::Touch, Point::new(3.0, 40.0), 0.0);
        assert!((sample.client_y - 40.0).abs() < f64::EPSILON);
        assert!(sample.is_touch());
        assert!((sample.with_client_y(7.0).client_y - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_release_events() {
        let sample = PointerSample::new(1, PointerType::Mouse, Point::new(0.0, 0.0), 0.0);
        assert!(PointerEvent::Up(sample).is_release());
        assert!(PointerEvent::Cancel(sample).is_release());
        assert!(!PointerEvent::Move(sample).is_release());
        assert_eq!(PointerEvent::Down(sample).sample().pointer_id, 1);
    }
}
