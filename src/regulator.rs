//! Lateral velocity clamping.
//!
//! Speeds just over the cap are clamped straight to it; speeds far over are
//! eased to the midpoint between cap and current speed instead, so a large
//! overshoot converges geometrically rather than snapping in one tick.

use crate::constants::{HARD_CLAMP_WINDOW, SOFT_CLAMP_BLEND};
use crate::vector_math::lerp;

/// Two-tier speed clamp.
#[derive(Debug, Clone, Copy)]
pub struct VelocityRegulator {
    /// Overshoot below this is hard-clamped to the cap.
    pub hard_clamp_window: f32,
    /// Blend factor between cap and current speed for the softened clamp.
    pub soft_clamp_blend: f32,
}

impl Default for VelocityRegulator {
    fn default() -> Self {
        Self {
            hard_clamp_window: HARD_CLAMP_WINDOW,
            soft_clamp_blend: SOFT_CLAMP_BLEND,
        }
    }
}

impl VelocityRegulator {
    /// Clamps a lateral speed against the cap.
    ///
    /// # Examples
    ///
    /// ```
    /// use strider::regulator::VelocityRegulator;
    /// let regulator = VelocityRegulator::default();
    /// assert_eq!(regulator.clamp_speed(9.0, 10.0), 9.0);
    /// assert_eq!(regulator.clamp_speed(10.05, 10.0), 10.0);
    /// assert_eq!(regulator.clamp_speed(20.0, 10.0), 15.0);
    /// ```
    pub fn clamp_speed(&self, speed: f32, cap: f32) -> f32 {
        if speed < cap {
            return speed;
        }
        if speed - cap < self.hard_clamp_window {
            return cap;
        }
        lerp(cap, speed, self.soft_clamp_blend)
    }
}
