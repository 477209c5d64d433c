//! Diagnostics overlay for the ground probes.
//!
//! Turns the most recent probe pass into plain line segments a debug
//! renderer can draw. Kept separate from the sensor so diagnostics have no
//! effect on core logic.

use glam::Vec3;

use crate::ground::{GroundProbe, GroundProbeSettings};

/// One probe ray as a drawable segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLine {
    /// Ray origin.
    pub start: Vec3,
    /// Ray end at the configured probe distance.
    pub end: Vec3,
    /// Whether this probe point hit ground last tick.
    pub hit: bool,
}

/// Builds the five probe segments for a capsule at `position`.
pub fn probe_lines(
    position: Vec3,
    settings: &GroundProbeSettings,
    probe: &GroundProbe,
) -> Vec<OverlayLine> {
    let origin = position + Vec3::Y * settings.vertical_offset;
    let side = settings.collider_radius * settings.inset;
    let down = Vec3::NEG_Y * settings.max_distance;
    let line = |offset: Vec3, hit: bool| OverlayLine {
        start: origin + offset,
        end: origin + offset + down,
        hit,
    };
    vec![
        line(Vec3::ZERO, probe.center),
        line(Vec3::Z * side, probe.forward),
        line(Vec3::NEG_Z * side, probe.back),
        line(Vec3::NEG_X * side, probe.left),
        line(Vec3::X * side, probe.right),
    ]
}
