//! Contract tests for the injected physics-body and pivot collaborators.
//!
//! These pin down exactly which mutations the controller requests per
//! phase, using hand-declared mocks rather than the reference body.

use glam::{Quat, Vec2, Vec3};
use mockall::mock;
use rstest::rstest;
use strider::{
    BoxWorld, ControllerConfig, ForceMode, GroundEdge, InputSnapshot, LayerMask,
    MovementController, PhysicsBody, PitchPivot,
};

const DT: f32 = 1.0 / 60.0;

mock! {
    Body {}

    impl PhysicsBody for Body {
        fn position(&self) -> Vec3;
        fn set_position(&mut self, position: Vec3);
        fn velocity(&self) -> Vec3;
        fn set_velocity(&mut self, velocity: Vec3);
        fn set_drag(&mut self, drag: f32);
        fn set_gravity_enabled(&mut self, enabled: bool);
        fn apply_force(&mut self, force: Vec3, mode: ForceMode);
        fn set_rotation(&mut self, rotation: Quat);
    }
}

mock! {
    Pivot {}

    impl PitchPivot for Pivot {
        fn set_local_rotation(&mut self, rotation: Quat);
    }
}

fn controller() -> MovementController {
    MovementController::new(ControllerConfig::default()).expect("default config is valid")
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

#[rstest]
fn jump_applies_exactly_one_impulse() {
    let mut c = controller();
    let jump_force = c.config().jump_force;
    let mut body = MockBody::new();
    body.expect_position().times(1).return_const(Vec3::ZERO);
    body.expect_set_position()
        .withf(|p| p.y > 0.0)
        .times(1)
        .return_const(());
    body.expect_apply_force()
        .withf(move |force, mode| {
            *mode == ForceMode::Impulse && (force.y - jump_force).abs() < f32::EPSILON
        })
        .times(1)
        .return_const(());

    let mut input = InputSnapshot::default();
    input.jump = true;
    c.update(&input, &mut body, DT);
    // Airborne now; holding the same edge-triggered input does nothing.
    c.update(&input, &mut body, DT);
}

#[rstest]
fn grounded_idle_tick_parks_the_body() {
    let mut c = controller();
    let stop_drag = c.config().stop_drag;
    let world = floor();
    let mut body = MockBody::new();
    let mut pivot = MockPivot::new();

    body.expect_position().times(1).return_const(Vec3::ZERO);
    body.expect_velocity().times(1).return_const(Vec3::ZERO);
    body.expect_set_gravity_enabled()
        .withf(|enabled| !enabled)
        .times(1)
        .return_const(());
    body.expect_apply_force()
        .withf(|force, mode| *mode == ForceMode::Force && force.length() == 0.0)
        .times(1)
        .return_const(());
    body.expect_set_drag()
        .withf(move |drag| (drag - stop_drag).abs() < f32::EPSILON)
        .times(1)
        .return_const(());
    body.expect_set_rotation().times(1).return_const(());
    pivot.expect_set_local_rotation().times(1).return_const(());

    c.fixed_update(&mut body, &mut pivot, &world);
    assert!(c.is_grounded());
}

#[rstest]
fn falling_body_gets_extra_gravity_and_no_drag() {
    let mut c = controller();
    let extra = c.config().extra_gravity;
    let empty = BoxWorld::new();
    let mut body = MockBody::new();
    let mut pivot = MockPivot::new();

    body.expect_position().times(2).return_const(Vec3::ZERO);
    body.expect_velocity()
        .times(3)
        .return_const(Vec3::new(0.0, -1.0, 0.0));
    // The anti-float assist only arrives once the controller knows it is
    // airborne, on the second tick.
    body.expect_apply_force()
        .withf(move |force, mode| {
            *mode == ForceMode::Force && (force.y + extra).abs() < f32::EPSILON
        })
        .times(1)
        .return_const(());
    body.expect_apply_force()
        .withf(|force, mode| *mode == ForceMode::Force && force.length() == 0.0)
        .times(2)
        .return_const(());
    body.expect_set_gravity_enabled()
        .withf(|enabled| *enabled)
        .times(2)
        .return_const(());
    body.expect_set_drag()
        .withf(|drag| *drag == 0.0)
        .times(2)
        .return_const(());
    body.expect_set_rotation().times(2).return_const(());
    pivot.expect_set_local_rotation().times(2).return_const(());

    c.fixed_update(&mut body, &mut pivot, &empty);
    c.fixed_update(&mut body, &mut pivot, &empty);

    assert!(!c.is_grounded());
    assert_eq!(c.take_ground_events(), vec![GroundEdge::Leave]);
}

#[rstest]
fn pivot_receives_the_clamped_pitch() {
    let mut c = controller();
    let max_pitch = c.config().max_pitch_angle;
    let world = floor();
    let mut body = MockBody::new();
    let mut pivot = MockPivot::new();

    // Crank the camera well past the pitch limit first.
    let mut look_down = InputSnapshot::default();
    look_down.look = Vec2::new(0.0, 100.0);
    let mut sink = MockBody::new();
    for _ in 0..100 {
        c.update(&look_down, &mut sink, DT);
    }

    body.expect_position().times(1).return_const(Vec3::ZERO);
    body.expect_velocity().times(1).return_const(Vec3::ZERO);
    body.expect_set_gravity_enabled().times(1).return_const(());
    body.expect_apply_force().times(1).return_const(());
    body.expect_set_drag().times(1).return_const(());
    body.expect_set_rotation().times(1).return_const(());
    pivot
        .expect_set_local_rotation()
        .withf(move |rotation| {
            let expected = Quat::from_rotation_x(-max_pitch.to_radians());
            rotation.abs_diff_eq(expected, 1e-5)
        })
        .times(1)
        .return_const(());

    c.fixed_update(&mut body, &mut pivot, &world);
}
