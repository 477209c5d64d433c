//! Basic vector math helper functions.
//! Small helpers for interpolating force vectors and projecting velocities.
use glam::{Quat, Vec3};

/// Threshold below which two directions are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;
/// Threshold below which a vector is treated as zero length.
const ZERO_EPSILON: f32 = 1e-8;

/// Spherically interpolates between two vectors, blending direction along
/// the arc between them and magnitude linearly.
///
/// The interpolation factor is clamped to `[0, 1]`. Zero-length endpoints
/// and opposed directions (where the rotation axis is undefined) fall back
/// to linear interpolation.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use strider::vector_math::slerp;
///
/// let from = Vec3::new(2.0, 0.0, 0.0);
/// let to = Vec3::new(0.0, 0.0, 4.0);
/// let mid = slerp(from, to, 0.5);
/// // Halfway along the arc the magnitude is halfway between 2 and 4.
/// assert!((mid.length() - 3.0).abs() < 1e-4);
/// // Direction bisects the quarter turn.
/// assert!((mid.x - mid.z).abs() < 1e-4);
/// ```
pub fn slerp(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let from_length = from.length();
    let to_length = to.length();
    if from_length < ZERO_EPSILON || to_length < ZERO_EPSILON {
        return from.lerp(to, t);
    }

    let from_dir = from / from_length;
    let to_dir = to / to_length;
    let dot = from_dir.dot(to_dir).clamp(-1.0, 1.0);
    let length = from_length + (to_length - from_length) * t;

    if dot > 1.0 - PARALLEL_EPSILON {
        return from_dir.lerp(to_dir, t).normalize_or_zero() * length;
    }

    let axis = from_dir.cross(to_dir);
    if axis.length_squared() < ZERO_EPSILON {
        // Opposed directions leave the rotation plane ambiguous.
        return from.lerp(to, t);
    }

    let rotation = Quat::from_axis_angle(axis.normalize(), dot.acos() * t);
    rotation * from_dir * length
}

/// Returns where `value` sits between `a` and `b`, clamped to `[0, 1]`.
///
/// # Examples
///
/// ```
/// use strider::vector_math::inverse_lerp;
/// assert!((inverse_lerp(0.5, 1.0, 0.75) - 0.5).abs() < f32::EPSILON);
/// assert!((inverse_lerp(0.5, 1.0, 2.0) - 1.0).abs() < f32::EPSILON);
/// ```
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    let span = b - a;
    if span.abs() < ZERO_EPSILON {
        return 0.0;
    }
    ((value - a) / span).clamp(0.0, 1.0)
}

/// Linear interpolation between two scalars.
///
/// # Examples
///
/// ```
/// use strider::vector_math::lerp;
/// assert!((lerp(10.0, 20.0, 0.5) - 15.0).abs() < f32::EPSILON);
/// ```
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Projects a vector onto the horizontal plane, dropping the vertical
/// component.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use strider::vector_math::horizontal;
/// assert_eq!(horizontal(Vec3::new(3.0, 7.0, 4.0)), Vec3::new(3.0, 0.0, 4.0));
/// ```
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}
