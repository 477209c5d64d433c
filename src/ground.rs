//! Ground contact sensing.
//!
//! Five parallel downward rays — capsule centre plus four horizontal
//! offsets — classify whether the capsule stands on a walkable surface.
//! The sensor keeps only the previous grounded flag so it can report edge
//! transitions; every state flip yields exactly one [`GroundEdge`].

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionWorld, LayerMask};

/// Geometry and filtering for the downward probe pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroundProbeSettings {
    /// Upward offset of the ray origins from the capsule position.
    pub vertical_offset: f32,
    /// Maximum ray length.
    pub max_distance: f32,
    /// Capsule radius the side probes are offset by.
    pub collider_radius: f32,
    /// Fraction of the radius the side probes are inset to, keeping them
    /// under the capsule rather than at its silhouette.
    pub inset: f32,
    /// Collision layers that count as ground.
    pub layer: LayerMask,
}

impl Default for GroundProbeSettings {
    fn default() -> Self {
        Self {
            vertical_offset: 0.1,
            max_distance: 0.2,
            collider_radius: 0.5,
            inset: 0.8,
            layer: LayerMask::GROUND,
        }
    }
}

/// Transient result of one probe pass: the overall flag plus which of the
/// five probe points hit. Not retained across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundProbe {
    /// Any probe ray hit.
    pub grounded: bool,
    /// Centre ray hit.
    pub center: bool,
    /// +Z offset ray hit.
    pub forward: bool,
    /// -Z offset ray hit.
    pub back: bool,
    /// -X offset ray hit.
    pub left: bool,
    /// +X offset ray hit.
    pub right: bool,
}

/// Transition-only notification for grounded-state flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundEdge {
    /// The capsule just made ground contact.
    Touch,
    /// The capsule just left the ground.
    Leave,
}

/// Edge-detecting ground contact sensor.
#[derive(Debug, Clone)]
pub struct GroundSensor {
    last_grounded: bool,
}

impl GroundSensor {
    /// Sensor seeded with an initial grounded state.
    pub fn new(initially_grounded: bool) -> Self {
        Self {
            last_grounded: initially_grounded,
        }
    }

    /// Grounded state after the most recent transition.
    pub fn is_grounded(&self) -> bool {
        self.last_grounded
    }

    /// Casts the five downward rays. Pure query: the result is a function
    /// of the collision geometry and the capsule position only.
    pub fn probe(
        world: &dyn CollisionWorld,
        position: Vec3,
        settings: &GroundProbeSettings,
    ) -> GroundProbe {
        let origin = position + Vec3::Y * settings.vertical_offset;
        let side = settings.collider_radius * settings.inset;
        let cast = |offset: Vec3| {
            world
                .raycast(origin + offset, Vec3::NEG_Y, settings.max_distance, settings.layer)
                .is_some()
        };

        let center = cast(Vec3::ZERO);
        let forward = cast(Vec3::Z * side);
        let back = cast(Vec3::NEG_Z * side);
        let left = cast(Vec3::NEG_X * side);
        let right = cast(Vec3::X * side);

        GroundProbe {
            grounded: center || forward || back || left || right,
            center,
            forward,
            back,
            left,
            right,
        }
    }

    /// Records a new grounded state and reports the edge if it flipped.
    ///
    /// All grounded transitions go through here, including the ones the
    /// controller forces (jump take-off, stair step-up), so callers observe
    /// exactly one edge per actual state change.
    pub fn transition(&mut self, grounded: bool) -> Option<GroundEdge> {
        if grounded == self.last_grounded {
            return None;
        }
        self.last_grounded = grounded;
        let edge = if grounded {
            GroundEdge::Touch
        } else {
            GroundEdge::Leave
        };
        debug!("ground edge: {edge:?}");
        Some(edge)
    }
}
