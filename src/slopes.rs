//! Stair and slope negotiation.
//!
//! While grounded and moving, the controller probes forward along the
//! movement direction. A low obstruction with clearance above it is a
//! climbable step and earns a vertical lift; anything taller is a wall or
//! slope, and movement into it is partially cancelled based on how head-on
//! the approach is.

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionWorld, LayerMask};
use crate::vector_math::{inverse_lerp, lerp};

/// Probe geometry and thresholds for stair and slope handling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StairSlopeSettings {
    /// Height above the capsule position the forward ray starts at.
    pub probe_height: f32,
    /// Forward ray length.
    pub probe_distance: f32,
    /// Tallest obstruction still treated as a step. The clearance re-probe
    /// is offset upward by this much.
    pub max_stair_height: f32,
    /// Vertical lift granted to the movement force when stepping up.
    pub stair_jump_height: f32,
    /// Steepness threshold as a dot product of movement direction and
    /// surface normal: `1.0` is movement straight into the wall, `0.0` is
    /// movement parallel to the surface.
    pub max_slope_dot: f32,
    /// Collision layers the probes query.
    pub layer: LayerMask,
}

impl Default for StairSlopeSettings {
    fn default() -> Self {
        Self {
            probe_height: 0.1,
            probe_distance: 1.2,
            max_stair_height: 0.3,
            stair_jump_height: 2.0,
            max_slope_dot: 0.5,
            layer: LayerMask::GROUND,
        }
    }
}

/// What the forward probe found and how movement was adjusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Nothing ahead; movement untouched.
    Clear,
    /// Climbable step: vertical lift added, grounded must be forced true
    /// for this tick regardless of the sensor result.
    SteppedUp,
    /// Wall or slope ahead: the given fraction of the movement force was
    /// cancelled.
    SlopeAdjusted {
        /// Fraction of movement removed, in `[0, 1]`.
        cancelled: f32,
    },
}

/// Forward-probing stair and slope negotiator.
#[derive(Debug, Clone, Default)]
pub struct SlopeStairNegotiator {
    settings: StairSlopeSettings,
}

impl SlopeStairNegotiator {
    /// Negotiator with explicit settings.
    pub fn new(settings: StairSlopeSettings) -> Self {
        Self { settings }
    }

    /// Probe settings in use.
    pub fn settings(&self) -> &StairSlopeSettings {
        &self.settings
    }

    /// Probes ahead along `direction` (normalised, horizontal) and adjusts
    /// `movement` in place.
    ///
    /// Step detection takes priority over slope handling for the same hit:
    /// if the re-probe offset up by `max_stair_height` is clear, the
    /// obstruction is treated as a climbable step even when the approach is
    /// head-on.
    pub fn negotiate(
        &self,
        world: &dyn CollisionWorld,
        position: Vec3,
        direction: Vec3,
        movement: &mut Vec3,
    ) -> StepOutcome {
        let s = &self.settings;
        let origin = position + Vec3::Y * s.probe_height;
        let Some(hit) = world.raycast(origin, direction, s.probe_distance, s.layer) else {
            return StepOutcome::Clear;
        };

        let clearance_origin = origin + Vec3::Y * s.max_stair_height;
        if world
            .raycast(clearance_origin, direction, s.probe_distance, s.layer)
            .is_none()
        {
            movement.y += s.stair_jump_height;
            debug!("step up: lift {} applied", s.stair_jump_height);
            return StepOutcome::SteppedUp;
        }

        let slope_dot = direction.dot(hit.normal).abs();
        if slope_dot >= s.max_slope_dot {
            // Remap [max_slope_dot, 1] to [1, 0]: cancellation peaks at the
            // threshold and falls to zero head-on.
            let t = inverse_lerp(s.max_slope_dot, 1.0, slope_dot);
            let cancelled = lerp(1.0, 0.0, t);
            *movement -= *movement * cancelled;
            debug!("slope contact: dot {slope_dot:.3}, cancelled {cancelled:.3}");
            return StepOutcome::SlopeAdjusted { cancelled };
        }

        StepOutcome::Clear
    }
}
