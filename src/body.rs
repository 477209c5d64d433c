//! Physics-body and camera-pivot collaborator contracts.
//!
//! The controller never owns the rigid body; it reads its state and requests
//! mutations through [`PhysicsBody`]. [`SimpleBody`] is a unit-mass reference
//! implementation that is good enough for the demo binary and the test
//! suite — it is not a production integrator.

use bevy::prelude::Component;
use glam::{Quat, Vec3};

use crate::collision::CollisionWorld;
use crate::constants::GRAVITY;
use crate::ground::GroundProbeSettings;

/// How a requested force is applied to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force, integrated over the fixed timestep.
    Force,
    /// Instantaneous impulse, changing velocity immediately.
    Impulse,
}

/// Mutation and read access the controller needs from the rigid body.
#[cfg_attr(test, mockall::automock)]
pub trait PhysicsBody {
    /// Current world position.
    fn position(&self) -> Vec3;
    /// Moves the body to a new world position.
    fn set_position(&mut self, position: Vec3);
    /// Current linear velocity.
    fn velocity(&self) -> Vec3;
    /// Overwrites the linear velocity.
    fn set_velocity(&mut self, velocity: Vec3);
    /// Sets the linear drag coefficient.
    fn set_drag(&mut self, drag: f32);
    /// Enables or disables gravity on the body.
    fn set_gravity_enabled(&mut self, enabled: bool);
    /// Requests a force or impulse.
    fn apply_force(&mut self, force: Vec3, mode: ForceMode);
    /// Writes the body orientation (the controller's yaw).
    fn set_rotation(&mut self, rotation: Quat);
}

/// Camera pivot collaborator; receives the local pitch rotation each fixed
/// tick.
#[cfg_attr(test, mockall::automock)]
pub trait PitchPivot {
    /// Writes the pivot's local rotation.
    fn set_local_rotation(&mut self, rotation: Quat);
}

/// Minimal rigid body with unit mass.
///
/// Impulses change velocity at the call site; continuous forces accumulate
/// and are consumed by [`SimpleBody::step`], which integrates gravity,
/// forces, linear drag and position in that order (semi-implicit Euler).
#[derive(Component, Debug, Clone)]
pub struct SimpleBody {
    position: Vec3,
    velocity: Vec3,
    rotation: Quat,
    drag: f32,
    gravity_enabled: bool,
    accumulated_force: Vec3,
}

impl Default for SimpleBody {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl SimpleBody {
    /// Body at rest at the given position with gravity enabled.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            drag: 0.0,
            gravity_enabled: true,
            accumulated_force: Vec3::ZERO,
        }
    }

    /// Current orientation.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Current drag coefficient.
    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Whether gravity currently acts on the body.
    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    /// Advances the body by one fixed timestep.
    pub fn step(&mut self, dt: f32) {
        if self.gravity_enabled {
            self.velocity.y += GRAVITY * dt;
        }
        self.velocity += self.accumulated_force * dt;
        self.accumulated_force = Vec3::ZERO;
        self.velocity *= (1.0 - self.drag * dt).max(0.0);
        self.position += self.velocity * dt;
    }

    /// Resolves ground and wall contact against the scene.
    ///
    /// [`SimpleBody`] has no contact solver, so hosts call this after
    /// [`SimpleBody::step`]. Faces blocking the path at waist height stop
    /// horizontal motion; surfaces underfoot catch a falling body, and a
    /// surface above the feet but below the waist pops the body up onto it.
    /// Low obstacles therefore behave as steps and tall ones as walls, the
    /// way a capsule collider resolves against both.
    pub fn settle(&mut self, world: &dyn CollisionWorld, settings: &GroundProbeSettings) {
        let waist = self.position + Vec3::Y * settings.collider_radius;

        let lateral = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        if let Some(direction) = lateral.try_normalize() {
            if let Some(hit) =
                world.raycast(waist, direction, settings.collider_radius, settings.layer)
            {
                let into = self.velocity.dot(hit.normal);
                if into < 0.0 {
                    self.velocity -= hit.normal * into;
                }
                self.position += hit.normal * (settings.collider_radius - hit.distance);
            }
        }

        let reach = settings.collider_radius + settings.max_distance;
        if let Some(hit) = world.raycast(waist, Vec3::NEG_Y, reach, settings.layer) {
            let surface = waist.y - hit.distance;
            if surface > self.position.y {
                self.position.y = surface;
                self.velocity.y = self.velocity.y.max(0.0);
            } else if self.velocity.y < 0.0 {
                self.position.y = surface;
                self.velocity.y = 0.0;
            }
        }
    }
}

impl PhysicsBody for SimpleBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn set_drag(&mut self, drag: f32) {
        self.drag = drag;
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        match mode {
            ForceMode::Force => self.accumulated_force += force,
            ForceMode::Impulse => self.velocity += force,
        }
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}
