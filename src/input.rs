//! Per-tick input snapshot consumed by the movement controller.
//!
//! The snapshot is produced once per rendered frame by the embedding layer
//! (or a scripted harness in tests) and is read-only to the controller.

use bevy::prelude::Resource;
use glam::{Vec2, Vec3};
use serde::Serialize;

/// Input values sampled for one variable-rate tick.
///
/// `movement` is expected to be unit-normalised on the XZ plane and `look`
/// is the raw per-frame pointer delta. `jump` is edge-triggered: true only
/// on the tick the key transitions down, while `jump_hold` is level.
#[derive(Resource, Debug, Clone, Serialize)]
pub struct InputSnapshot {
    /// Desired movement direction on the XZ plane, unit-normalised.
    pub movement: Vec3,
    /// Raw look delta for this frame.
    pub look: Vec2,
    /// Jump key went down this tick.
    pub jump: bool,
    /// Jump key is currently held.
    pub jump_hold: bool,
    /// Sprint key is currently held.
    pub sprint: bool,
    /// Invert the horizontal look axis.
    pub invert_look_x: bool,
    /// Invert the vertical look axis.
    pub invert_look_y: bool,
    /// Horizontal look sensitivity factor from the options file.
    pub look_sensitivity_x: f32,
    /// Vertical look sensitivity factor from the options file.
    pub look_sensitivity_y: f32,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            movement: Vec3::ZERO,
            look: Vec2::ZERO,
            jump: false,
            jump_hold: false,
            sprint: false,
            invert_look_x: false,
            invert_look_y: false,
            look_sensitivity_x: 1.0,
            look_sensitivity_y: 1.0,
        }
    }
}

impl InputSnapshot {
    /// Snapshot with a movement direction and everything else at rest.
    ///
    /// The direction is normalised, matching the contract that the input
    /// collaborator hands the controller a unit vector.
    pub fn moving(direction: Vec3) -> Self {
        Self {
            movement: direction.normalize_or_zero(),
            ..Self::default()
        }
    }
}
