//! Inertial scrolling after a touch pan is released.
//!
//! The scroll is a repeating task driven by the host's frame clock. Each
//! [`InertialScroller::tick`] advances it by one frame. Starting a new task
//! or calling [`InertialScroller::cancel`] trips the task's
//! [`CancellationToken`], so a frame loop holding a clone of the token can
//! stop scheduling itself.

use crate::config::EngineConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag marking a task as cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A single running inertial scroll.
#[derive(Debug, Clone)]
struct InertiaTask {
    /// Pixels per millisecond.
    velocity: f64,
    token: CancellationToken,
}

/// Owns at most one inertial scroll task.
#[derive(Debug, Clone)]
pub struct InertialScroller {
    decay: f64,
    min_velocity: f64,
    frame_duration_ms: f64,
    task: Option<InertiaTask>,
}

impl Default for InertialScroller {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl InertialScroller {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            decay: config.inertia_decay,
            min_velocity: config.min_velocity,
            frame_duration_ms: config.frame_duration_ms,
            task: None,
        }
    }

    /// Start scrolling with `velocity` (px/ms), replacing any running task.
    ///
    /// Returns `None` without starting when the velocity is too small.
    pub fn start(&mut self, velocity: f64) -> Option<CancellationToken> {
        self.cancel();
        if !velocity.is_finite() || velocity.abs() <= self.min_velocity {
            return None;
        }
        let token = CancellationToken::new();
        log::debug!("inertia start: velocity {velocity:.3} px/ms");
        self.task = Some(InertiaTask {
            velocity,
            token: token.clone(),
        });
        Some(token)
    }

    /// Stop the running task, if any.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.token.cancel();
            log::debug!("inertia cancelled at velocity {:.3}", task.velocity);
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.token.is_cancelled())
    }

    /// Current velocity, or zero when idle.
    pub fn velocity(&self) -> f64 {
        self.task.as_ref().map_or(0.0, |t| t.velocity)
    }

    /// Advance one frame and return the pan to apply, if the task is alive.
    pub fn tick(&mut self) -> Option<f64> {
        let task = self.task.as_mut()?;
        if task.token.is_cancelled() {
            self.task = None;
            return None;
        }

        let pan = task.velocity * self.frame_duration_ms;
        task.velocity *= self.decay;
        log::trace!("inertia frame: pan {pan:.2}, velocity now {:.4}", task.velocity);

        if task.velocity.abs() <= self.min_velocity {
            // Finished: drop the task so its velocity reads as zero.
            task.token.cancel();
            self.task = None;
        }
        Some(pan)
    }
}
