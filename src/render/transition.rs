use std::time::Duration;

use crate::layout::Frame;

/// Progress curve applied to the transition clock before interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity
    #[default]
    Linear,
    /// Cubic ease-in-out (slow start and end)
    CubicInOut,
}

impl Easing {
    /// Map `t` in [0, 1] to eased progress in [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Linear interpolation of all four frame fields. `t >= 1` returns `target` exactly.
pub fn interpolate(current: &Frame, target: &Frame, t: f64) -> Frame {
    if t >= 1.0 {
        return *target;
    }
    let t = t.max(0.0);
    let lerp = |a: f64, b: f64| a + (b - a) * t;
    Frame {
        angle_start: lerp(current.angle_start, target.angle_start),
        angle_end: lerp(current.angle_end, target.angle_end),
        depth_start: lerp(current.depth_start, target.depth_start),
        depth_end: lerp(current.depth_end, target.depth_end),
    }
}

/// Time-based progress over a fixed duration, advanced by an external clock.
///
/// Elapsed time is tracked as a [`Duration`] so repeated ticks do not drift.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Transition {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Raw linear progress (before easing), in [0, 1].
    pub fn raw_progress(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Eased progress, in [0, 1].
    pub fn progress(&self) -> f64 {
        self.easing.apply(self.raw_progress())
    }
}
