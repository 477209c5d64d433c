//! Tuning constants shared across the controller modules.

/// Downward gravitational acceleration applied by the reference body.
pub const GRAVITY: f32 = -9.81;
/// Rate at which the smoothed movement force chases the raw input force.
pub const MOVEMENT_SMOOTHING_RATE: f32 = 10.0;
/// Rate at which the velocity cap chases the walk or sprint cap while
/// grounded.
pub const MAX_VELOCITY_UPDATE_SPEED: f32 = 10.0;
/// Vertical position bias applied on jump take-off so the next ground probe
/// does not immediately re-ground the capsule.
pub const JUMP_GROUND_CLEARANCE: f32 = 0.5;
/// Overshoot window within which lateral speed is clamped straight to the
/// cap instead of being eased toward it.
pub const HARD_CLAMP_WINDOW: f32 = 0.1;
/// Blend factor for the softened clamp applied when speed is far over the
/// cap. `0.5` lands on the midpoint between cap and current speed.
pub const SOFT_CLAMP_BLEND: f32 = 0.5;
/// Speed below which the body is reported as not moving.
pub const MIN_MOVE_SPEED: f32 = f32::EPSILON;
/// Full turn in degrees; yaw is wrapped into this range.
pub const FULL_TURN_DEGREES: f32 = 360.0;
