//! Ray queries against the collision world.
//!
//! The controller only ever needs one primitive from the physics engine: a
//! ray cast that reports the distance to the nearest surface and its normal.
//! [`CollisionWorld`] captures that contract, and [`BoxWorld`] provides a
//! small axis-aligned-box implementation for the demo binary and the tests.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bit mask selecting which collision layers a query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Layer the ground probes query by default.
    pub const GROUND: Self = Self(1 << 3);
    /// Mask matching every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Returns `true` when the two masks share at least one layer.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// Nearest surface found by a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the surface.
    pub distance: f32,
    /// Outward surface normal at the hit point.
    pub normal: Vec3,
}

/// Ray-query interface the controller depends on.
///
/// A query that finds no surface returns `None`; misses are normal control
/// flow, never an error.
#[cfg_attr(test, mockall::automock)]
pub trait CollisionWorld {
    /// Casts a ray and returns the nearest hit within `max_distance` on the
    /// masked layers.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

/// Axis-aligned box with a layer assignment.
#[derive(Debug, Clone, Copy)]
pub struct BoxCollider {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
    /// Layers this collider occupies.
    pub layers: LayerMask,
}

/// Which axis a ray entered a box through. Used to derive the hit normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryAxis {
    X,
    Y,
    Z,
}

/// Interval of ray parameters overlapping one slab, or `None` when the ray
/// runs parallel outside it.
fn axis_span(origin: f32, direction: f32, min: f32, max: f32) -> Option<(f32, f32)> {
    if direction.abs() < 1e-8 {
        if origin < min || origin > max {
            return None;
        }
        return Some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let t1 = (min - origin) / direction;
    let t2 = (max - origin) / direction;
    Some((t1.min(t2), t1.max(t2)))
}

impl BoxCollider {
    /// Creates a collider from two corners on the given layers.
    pub fn new(min: Vec3, max: Vec3, layers: LayerMask) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            layers,
        }
    }

    /// Slab-method ray intersection returning the entry distance and the
    /// entry-face normal.
    ///
    /// Rays starting inside the box report no hit; back faces are never
    /// considered.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let (tx0, tx1) = axis_span(origin.x, direction.x, self.min.x, self.max.x)?;
        let (ty0, ty1) = axis_span(origin.y, direction.y, self.min.y, self.max.y)?;
        let (tz0, tz1) = axis_span(origin.z, direction.z, self.min.z, self.max.z)?;

        let mut entry = tx0;
        let mut axis = EntryAxis::X;
        if ty0 > entry {
            entry = ty0;
            axis = EntryAxis::Y;
        }
        if tz0 > entry {
            entry = tz0;
            axis = EntryAxis::Z;
        }
        let exit = tx1.min(ty1).min(tz1);

        if entry > exit || entry < 0.0 || entry > max_distance {
            return None;
        }

        let normal = match axis {
            EntryAxis::X => Vec3::X * -direction.x.signum(),
            EntryAxis::Y => Vec3::Y * -direction.y.signum(),
            EntryAxis::Z => Vec3::Z * -direction.z.signum(),
        };
        Some(RayHit {
            distance: entry,
            normal,
        })
    }
}

/// Collision world backed by a flat list of axis-aligned boxes.
#[derive(Debug, Default)]
pub struct BoxWorld {
    colliders: Vec<BoxCollider>,
}

impl BoxWorld {
    /// Empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a box between two corners on the given layers.
    pub fn add_box(&mut self, min: Vec3, max: Vec3, layers: LayerMask) -> &mut Self {
        self.colliders.push(BoxCollider::new(min, max, layers));
        self
    }

    /// Number of colliders in the world.
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the world holds no colliders.
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl CollisionWorld for BoxWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        self.colliders
            .iter()
            .filter(|c| c.layers.intersects(mask))
            .filter_map(|c| c.raycast(origin, direction, max_distance))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
