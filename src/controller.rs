//! First-person movement controller.
//!
//! Orchestrates the ground sensor, the stair/slope negotiator and the
//! velocity regulator across the two scheduler phases: a variable-rate
//! phase once per rendered frame and a fixed-rate phase once per physics
//! step. The controller owns the motion state; the rigid body, camera pivot
//! and collision world are injected collaborators.

use bevy::prelude::Component;
use glam::{Quat, Vec3};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::body::{ForceMode, PhysicsBody, PitchPivot};
use crate::collision::CollisionWorld;
use crate::constants::{
    FULL_TURN_DEGREES, JUMP_GROUND_CLEARANCE, MAX_VELOCITY_UPDATE_SPEED, MIN_MOVE_SPEED,
    MOVEMENT_SMOOTHING_RATE,
};
use crate::ground::{GroundEdge, GroundProbe, GroundProbeSettings, GroundSensor};
use crate::input::InputSnapshot;
use crate::regulator::VelocityRegulator;
use crate::slopes::{SlopeStairNegotiator, StairSlopeSettings, StepOutcome};
use crate::vector_math::{horizontal, lerp, slerp};

/// Tuning values for the movement controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Lateral speed cap while walking on the ground.
    pub max_grounded_walk_velocity: f32,
    /// Lateral speed cap while sprinting on the ground.
    pub max_grounded_sprint_velocity: f32,
    /// Movement force scale while grounded.
    pub grounded_acceleration: f32,
    /// Movement force scale while airborne.
    pub aerial_acceleration: f32,
    /// Drag applied when grounded with no movement input.
    pub stop_drag: f32,
    /// Pitch limit in degrees, applied symmetrically.
    pub max_pitch_angle: f32,
    /// Base look sensitivity multiplied into both look axes.
    pub base_look_sensitivity: f32,
    /// Upward impulse applied on jump.
    pub jump_force: f32,
    /// Extra downward force while airborne and falling or not holding jump.
    pub extra_gravity: f32,
    /// Lateral speed cap while airborne.
    pub max_aerial_velocity: f32,
    /// Downward probe pattern settings.
    pub ground: GroundProbeSettings,
    /// Forward probe settings for stairs and slopes.
    pub stairs: StairSlopeSettings,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_grounded_walk_velocity: 10.0,
            max_grounded_sprint_velocity: 15.0,
            grounded_acceleration: 10.0,
            aerial_acceleration: 0.5,
            stop_drag: 100.0,
            max_pitch_angle: 80.0,
            base_look_sensitivity: 50.0,
            jump_force: 5.0,
            extra_gravity: 2.0,
            max_aerial_velocity: 500.0,
            ground: GroundProbeSettings::default(),
            stairs: StairSlopeSettings::default(),
        }
    }
}

/// Rejected controller configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A velocity cap was zero or negative.
    #[error("velocity cap must be positive (got {0})")]
    NonPositiveVelocityCap(f32),
    /// The pitch limit was zero or negative.
    #[error("max pitch angle must be positive (got {0})")]
    NonPositivePitchLimit(f32),
    /// The slope steepness threshold left the dot-product domain.
    #[error("max slope dot must lie in [0, 1] (got {0})")]
    SlopeDotOutOfRange(f32),
    /// A probe ray length was zero or negative.
    #[error("probe distance must be positive (got {0})")]
    NonPositiveProbeDistance(f32),
}

impl ControllerConfig {
    /// Validates the invariants the controller relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for cap in [
            self.max_grounded_walk_velocity,
            self.max_grounded_sprint_velocity,
            self.max_aerial_velocity,
        ] {
            if cap <= 0.0 {
                return Err(ConfigError::NonPositiveVelocityCap(cap));
            }
        }
        if self.max_pitch_angle <= 0.0 {
            return Err(ConfigError::NonPositivePitchLimit(self.max_pitch_angle));
        }
        if !(0.0..=1.0).contains(&self.stairs.max_slope_dot) {
            return Err(ConfigError::SlopeDotOutOfRange(self.stairs.max_slope_dot));
        }
        for distance in [self.ground.max_distance, self.stairs.probe_distance] {
            if distance <= 0.0 {
                return Err(ConfigError::NonPositiveProbeDistance(distance));
            }
        }
        Ok(())
    }
}

/// Capsule movement controller.
///
/// Owns the motion state exclusively; collaborators are borrowed per phase.
#[derive(Component, Debug, Clone)]
pub struct MovementController {
    config: ControllerConfig,
    sensor: GroundSensor,
    negotiator: SlopeStairNegotiator,
    regulator: VelocityRegulator,

    is_grounded: bool,
    is_moving: bool,
    is_trying_to_move: bool,
    is_trying_to_sprint: bool,
    is_sprinting: bool,
    is_holding_jump: bool,

    acceleration: f32,
    max_velocity: f32,
    last_movement: Vec3,
    movement: Vec3,

    camera_pitch: f32,
    camera_yaw: f32,

    last_probe: GroundProbe,
    events: Vec<GroundEdge>,
}

impl MovementController {
    /// Controller starting grounded and at rest.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration violates the
    /// controller's invariants.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let max_velocity = config.max_grounded_walk_velocity;
        let acceleration = config.grounded_acceleration;
        let negotiator = SlopeStairNegotiator::new(config.stairs);
        Ok(Self {
            config,
            sensor: GroundSensor::new(true),
            negotiator,
            regulator: VelocityRegulator::default(),
            is_grounded: true,
            is_moving: false,
            is_trying_to_move: false,
            is_trying_to_sprint: false,
            is_sprinting: false,
            is_holding_jump: false,
            acceleration,
            max_velocity,
            last_movement: Vec3::ZERO,
            movement: Vec3::ZERO,
            camera_pitch: 0.0,
            camera_yaw: 0.0,
            last_probe: GroundProbe::default(),
            events: Vec::new(),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Whether the capsule currently stands on walkable ground.
    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    /// Whether the body moved faster than the rest threshold last tick.
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Whether the smoothed movement force is non-zero.
    pub fn is_trying_to_move(&self) -> bool {
        self.is_trying_to_move
    }

    /// Whether sprint is active (requires ground contact).
    pub fn is_sprinting(&self) -> bool {
        self.is_sprinting
    }

    /// Current smoothed movement force.
    pub fn movement(&self) -> Vec3 {
        self.movement
    }

    /// Current lateral velocity cap.
    pub fn max_velocity(&self) -> f32 {
        self.max_velocity
    }

    /// Camera yaw in degrees, wrapped into a single turn.
    pub fn camera_yaw(&self) -> f32 {
        self.camera_yaw
    }

    /// Camera pitch in degrees, clamped to the configured limit.
    pub fn camera_pitch(&self) -> f32 {
        self.camera_pitch
    }

    /// Result of the most recent ground probe, for diagnostics.
    pub fn last_probe(&self) -> GroundProbe {
        self.last_probe
    }

    /// Drains the buffered ground edges in the order they fired.
    pub fn take_ground_events(&mut self) -> Vec<GroundEdge> {
        std::mem::take(&mut self.events)
    }

    fn can_jump(&self) -> bool {
        self.is_grounded
    }

    fn can_sprint(&self) -> bool {
        self.is_grounded
    }

    /// Routes a grounded-state change through the sensor so exactly one
    /// edge fires per flip, and reacts to touch-down by resynchronising the
    /// velocity cap.
    fn apply_grounded(&mut self, grounded: bool) {
        self.is_grounded = grounded;
        if let Some(edge) = self.sensor.transition(grounded) {
            if edge == GroundEdge::Touch {
                self.max_velocity = if self.is_trying_to_sprint {
                    self.config.max_grounded_sprint_velocity
                } else {
                    self.config.max_grounded_walk_velocity
                };
            }
            self.events.push(edge);
        }
    }

    /// Variable-rate phase, once per rendered frame.
    pub fn update(&mut self, input: &InputSnapshot, body: &mut dyn PhysicsBody, dt: f32) {
        self.acceleration = if self.is_grounded {
            self.config.grounded_acceleration
        } else {
            self.config.aerial_acceleration
        };
        self.is_holding_jump = input.jump_hold;

        if input.jump && self.can_jump() {
            self.apply_grounded(false);
            // Bias upward so the next probe does not instantly re-ground.
            body.set_position(body.position() + Vec3::Y * JUMP_GROUND_CLEARANCE);
            body.apply_force(Vec3::Y * self.config.jump_force, ForceMode::Impulse);
            debug!("jump: impulse {}", self.config.jump_force);
        }

        let orientation = Quat::from_rotation_y(self.camera_yaw.to_radians());
        let current_movement = orientation * input.movement * self.acceleration;
        self.movement = slerp(
            self.last_movement,
            current_movement,
            dt * MOVEMENT_SMOOTHING_RATE,
        );

        self.is_trying_to_move = self.movement.length() != 0.0;
        self.is_trying_to_sprint = input.sprint;
        self.is_sprinting = self.is_trying_to_sprint && self.can_sprint();

        if self.is_grounded {
            let cap = if self.is_sprinting {
                self.config.max_grounded_sprint_velocity
            } else {
                self.config.max_grounded_walk_velocity
            };
            self.max_velocity = lerp(self.max_velocity, cap, dt * MAX_VELOCITY_UPDATE_SPEED);
        } else {
            self.max_velocity = self.config.max_aerial_velocity;
        }

        let invert_x = if input.invert_look_x { -1.0 } else { 1.0 };
        let invert_y = if input.invert_look_y { 1.0 } else { -1.0 };
        let sensitivity = self.config.base_look_sensitivity;
        self.camera_yaw = (self.camera_yaw
            + input.look.x * sensitivity * input.look_sensitivity_x * invert_x * dt)
            % FULL_TURN_DEGREES;
        self.camera_pitch += input.look.y * sensitivity * input.look_sensitivity_y * invert_y * dt;
        self.camera_pitch =
            self.camera_pitch.abs().min(self.config.max_pitch_angle) * self.camera_pitch.signum();

        self.last_movement = current_movement;
    }

    /// Fixed-rate phase, once per physics step.
    pub fn fixed_update(
        &mut self,
        body: &mut dyn PhysicsBody,
        pivot: &mut dyn PitchPivot,
        world: &dyn CollisionWorld,
    ) {
        let mut stepped_up = false;
        if self.is_grounded {
            let direction = horizontal(self.movement).normalize_or_zero();
            if direction != Vec3::ZERO {
                let outcome =
                    self.negotiator
                        .negotiate(world, body.position(), direction, &mut self.movement);
                stepped_up = outcome == StepOutcome::SteppedUp;
            }
        }

        if !self.is_grounded && (body.velocity().y < 0.0 || !self.is_holding_jump) {
            body.apply_force(Vec3::NEG_Y * self.config.extra_gravity, ForceMode::Force);
        }

        self.last_probe = GroundSensor::probe(world, body.position(), &self.config.ground);
        // A step-up this tick overrides whatever the probes said.
        self.apply_grounded(self.last_probe.grounded || stepped_up);
        body.set_gravity_enabled(!self.is_grounded);

        body.apply_force(self.movement, ForceMode::Force);

        let velocity = body.velocity();
        let lateral = horizontal(velocity);
        let speed = lateral.length();
        self.is_moving = velocity.length() > MIN_MOVE_SPEED;
        let clamped = self.regulator.clamp_speed(speed, self.max_velocity);
        if clamped < speed {
            let scaled = lateral * (clamped / speed);
            body.set_velocity(Vec3::new(scaled.x, velocity.y, scaled.z));
        }

        body.set_drag(if self.is_trying_to_move {
            0.0
        } else if self.is_grounded {
            self.config.stop_drag
        } else {
            0.0
        });

        body.set_rotation(Quat::from_rotation_y(self.camera_yaw.to_radians()));
        pivot.set_local_rotation(Quat::from_rotation_x(self.camera_pitch.to_radians()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::SimpleBody;
    use crate::collision::{BoxWorld, LayerMask};
    use approx::assert_relative_eq;
    use glam::Vec2;
    use rstest::rstest;

    const DT: f32 = 1.0 / 60.0;

    struct NullPivot;

    impl PitchPivot for NullPivot {
        fn set_local_rotation(&mut self, _rotation: Quat) {}
    }

    fn floor() -> BoxWorld {
        let mut world = BoxWorld::new();
        world.add_box(
            Vec3::new(-50.0, -1.0, -50.0),
            Vec3::new(50.0, 0.0, 50.0),
            LayerMask::GROUND,
        );
        world
    }

    fn controller() -> MovementController {
        MovementController::new(ControllerConfig::default()).expect("default config is valid")
    }

    #[rstest]
    fn default_config_passes_validation() {
        assert!(ControllerConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case(ControllerConfig { max_grounded_walk_velocity: 0.0, ..ControllerConfig::default() })]
    #[case(ControllerConfig { max_aerial_velocity: -1.0, ..ControllerConfig::default() })]
    #[case(ControllerConfig { max_pitch_angle: 0.0, ..ControllerConfig::default() })]
    fn invalid_config_is_rejected(#[case] config: ControllerConfig) {
        assert!(MovementController::new(config).is_err());
    }

    #[rstest]
    fn rejects_slope_dot_outside_unit_interval() {
        let mut config = ControllerConfig::default();
        config.stairs.max_slope_dot = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SlopeDotOutOfRange(_))
        ));
    }

    #[rstest]
    fn zero_input_decays_movement_and_applies_stop_drag() {
        let mut c = controller();
        let mut body = SimpleBody::new(Vec3::ZERO);
        let mut pivot = NullPivot;
        let world = floor();

        // Build up some movement first.
        let moving = InputSnapshot::moving(Vec3::Z);
        for _ in 0..10 {
            c.update(&moving, &mut body, DT);
            c.fixed_update(&mut body, &mut pivot, &world);
            body.step(DT);
        }
        let built_up = c.movement().length();
        assert!(built_up > 0.0);

        let idle = InputSnapshot::default();
        c.update(&idle, &mut body, DT);
        assert!(c.movement().length() < built_up);
        // The raw target reached zero last frame, so the smoothed force
        // collapses exactly to zero now.
        c.update(&idle, &mut body, DT);
        assert_relative_eq!(c.movement().length(), 0.0);

        c.fixed_update(&mut body, &mut pivot, &world);
        assert!(!c.is_trying_to_move());
        assert_relative_eq!(body.drag(), c.config().stop_drag);
    }

    #[rstest]
    fn jump_requires_ground_and_fires_one_leave_edge() {
        let mut c = controller();
        let mut body = SimpleBody::new(Vec3::ZERO);
        let mut input = InputSnapshot::default();
        input.jump = true;
        input.jump_hold = true;

        c.update(&input, &mut body, DT);
        assert!(!c.is_grounded());
        assert_eq!(c.take_ground_events(), vec![GroundEdge::Leave]);
        assert_relative_eq!(body.position().y, JUMP_GROUND_CLEARANCE);
        assert_relative_eq!(body.velocity().y, c.config().jump_force);

        // Airborne now; a second edge-triggered jump is ignored.
        c.update(&input, &mut body, DT);
        assert!(c.take_ground_events().is_empty());
        assert_relative_eq!(body.velocity().y, c.config().jump_force);
    }

    #[rstest]
    fn landing_fires_touch_edge_and_restores_walk_cap() {
        let mut c = controller();
        let mut body = SimpleBody::new(Vec3::new(0.0, 5.0, 0.0));
        let mut pivot = NullPivot;
        let world = floor();
        let idle = InputSnapshot::default();

        // First fixed tick discovers the capsule is airborne.
        c.update(&idle, &mut body, DT);
        c.fixed_update(&mut body, &mut pivot, &world);
        assert!(!c.is_grounded());
        assert_eq!(c.take_ground_events(), vec![GroundEdge::Leave]);

        // The next variable tick snaps the cap to the aerial limit.
        c.update(&idle, &mut body, DT);
        assert_relative_eq!(c.max_velocity(), c.config().max_aerial_velocity);

        // Drop to the floor and re-probe.
        body.set_position(Vec3::ZERO);
        c.fixed_update(&mut body, &mut pivot, &world);
        assert!(c.is_grounded());
        assert_eq!(c.take_ground_events(), vec![GroundEdge::Touch]);
        // Touch-down resynchronises the cap to the walk limit.
        assert_relative_eq!(c.max_velocity(), c.config().max_grounded_walk_velocity);
    }

    #[rstest]
    fn unchanged_ground_state_fires_no_events() {
        let mut c = controller();
        let mut body = SimpleBody::new(Vec3::ZERO);
        let mut pivot = NullPivot;
        let world = floor();
        let idle = InputSnapshot::default();

        for _ in 0..5 {
            c.update(&idle, &mut body, DT);
            c.fixed_update(&mut body, &mut pivot, &world);
        }
        assert!(c.take_ground_events().is_empty());
    }

    #[rstest]
    fn sprint_raises_velocity_cap_only_on_ground() {
        let mut c = controller();
        let mut body = SimpleBody::new(Vec3::ZERO);
        let mut pivot = NullPivot;
        let world = floor();
        let mut input = InputSnapshot::moving(Vec3::Z);
        input.sprint = true;

        for _ in 0..200 {
            c.update(&input, &mut body, DT);
            c.fixed_update(&mut body, &mut pivot, &world);
        }
        assert!(c.is_sprinting());
        assert_relative_eq!(
            c.max_velocity(),
            c.config().max_grounded_sprint_velocity,
            epsilon = 0.05
        );

        // Sprint needs ground contact.
        body.set_position(Vec3::new(0.0, 10.0, 0.0));
        c.update(&input, &mut body, DT);
        c.fixed_update(&mut body, &mut pivot, &world);
        c.update(&input, &mut body, DT);
        assert!(!c.is_sprinting());
        assert_relative_eq!(c.max_velocity(), c.config().max_aerial_velocity);
    }

    #[rstest]
    #[case(Vec2::new(10.0, 0.0), false)]
    #[case(Vec2::new(-10.0, 0.0), false)]
    #[case(Vec2::new(10.0, 0.0), true)]
    fn yaw_stays_within_a_single_turn(#[case] look: Vec2, #[case] invert: bool) {
        let mut c = controller();
        let mut body = SimpleBody::new(Vec3::ZERO);
        let mut input = InputSnapshot::default();
        input.look = look;
        input.invert_look_x = invert;

        for _ in 0..500 {
            c.update(&input, &mut body, DT);
            assert!(c.camera_yaw().abs() < FULL_TURN_DEGREES);
        }
    }

    #[rstest]
    #[case(Vec2::new(0.0, 25.0))]
    #[case(Vec2::new(0.0, -25.0))]
    fn pitch_never_exceeds_the_configured_limit(#[case] look: Vec2) {
        let mut c = controller();
        let mut body = SimpleBody::new(Vec3::ZERO);
        let mut input = InputSnapshot::default();
        input.look = look;

        for _ in 0..500 {
            c.update(&input, &mut body, DT);
            assert!(c.camera_pitch().abs() <= c.config().max_pitch_angle);
        }
    }

    #[rstest]
    fn look_inversion_flips_the_yaw_direction() {
        let mut body = SimpleBody::new(Vec3::ZERO);
        let mut input = InputSnapshot::default();
        input.look = Vec2::new(1.0, 0.0);

        let mut normal = controller();
        normal.update(&input, &mut body, DT);

        input.invert_look_x = true;
        let mut inverted = controller();
        inverted.update(&input, &mut body, DT);

        assert_relative_eq!(normal.camera_yaw(), -inverted.camera_yaw());
    }
}
