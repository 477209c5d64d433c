//! Bevy plugin hosting the movement controller.
//!
//! The variable-rate phase runs in `Update` and the fixed-rate phase in
//! `FixedUpdate`, preserving the host scheduler's contract that a frame's
//! variable tick completes before its physics steps. The embedding publishes
//! an [`InputSnapshot`] resource once per frame; ground edges stay buffered
//! on the controller component for hosts to drain.

use bevy::prelude::*;
use glam::Vec3;
use log::info;

use crate::body::{PhysicsBody, PitchPivot, SimpleBody};
use crate::collision::BoxWorld;
use crate::controller::{ConfigError, ControllerConfig, MovementController};
use crate::input::InputSnapshot;

/// Marker for the player capsule entity.
#[derive(Component, Debug)]
pub struct Player;

/// Marker for the camera pivot entity receiving pitch writes.
#[derive(Component, Debug)]
pub struct CameraBoom;

/// Link from a player to its camera pivot entity.
#[derive(Component, Debug)]
pub struct PivotRef(pub Entity);

/// Collision geometry the controller probes against.
#[derive(Resource, Default)]
pub struct SceneColliders(BoxWorld);

impl SceneColliders {
    /// Wraps an existing world.
    pub fn new(world: BoxWorld) -> Self {
        Self(world)
    }

    /// Read access for queries.
    pub fn world(&self) -> &BoxWorld {
        &self.0
    }

    /// Mutable access for scene building.
    pub fn world_mut(&mut self) -> &mut BoxWorld {
        &mut self.0
    }
}

/// Entities created by [`spawn_player`].
#[derive(Debug, Clone, Copy)]
pub struct PlayerRig {
    /// The capsule entity carrying controller and body.
    pub player: Entity,
    /// The camera pivot entity.
    pub pivot: Entity,
}

/// Spawns a player capsule and its camera pivot, wired together.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the configuration fails validation.
pub fn spawn_player(
    world: &mut World,
    config: ControllerConfig,
    position: Vec3,
) -> Result<PlayerRig, ConfigError> {
    let controller = MovementController::new(config)?;
    let pivot = world.spawn((CameraBoom, Transform::default())).id();
    let player = world
        .spawn((
            Player,
            controller,
            SimpleBody::new(position),
            Transform::from_translation(position),
            PivotRef(pivot),
        ))
        .id();
    info!("spawned player rig {player:?} with pivot {pivot:?}");
    Ok(PlayerRig { player, pivot })
}

/// Adapts a pivot entity's `Transform` to the controller's pivot contract.
struct PivotTransform<'a>(&'a mut Transform);

impl PitchPivot for PivotTransform<'_> {
    fn set_local_rotation(&mut self, rotation: Quat) {
        self.0.rotation = rotation;
    }
}

/// Every player must reference a live camera pivot; a rig without one is
/// misconfigured beyond recovery, so fail loudly rather than skip it.
fn validate_player_rigs_system(
    players: Query<(Entity, &PivotRef), With<Player>>,
    pivots: Query<(), With<CameraBoom>>,
) {
    for (player, pivot_ref) in &players {
        assert!(
            pivots.contains(pivot_ref.0),
            "camera pivot needs to be set on player {player:?}"
        );
    }
}

/// Variable-rate phase: feed the frame's input snapshot to each controller.
fn steer_players_system(
    time: Res<Time>,
    input: Res<InputSnapshot>,
    mut players: Query<(&mut MovementController, &mut SimpleBody), With<Player>>,
) {
    for (mut controller, mut body) in &mut players {
        controller.update(&input, &mut *body, time.delta_secs());
    }
}

/// Fixed-rate phase: sensors, forces and the velocity clamp.
fn drive_players_system(
    scene: Res<SceneColliders>,
    mut players: Query<(&mut MovementController, &mut SimpleBody, &PivotRef), With<Player>>,
    mut pivots: Query<&mut Transform, With<CameraBoom>>,
) {
    for (mut controller, mut body, pivot_ref) in &mut players {
        let Ok(mut pivot_transform) = pivots.get_mut(pivot_ref.0) else {
            continue;
        };
        let mut pivot = PivotTransform(&mut pivot_transform);
        controller.fixed_update(&mut *body, &mut pivot, scene.world());
    }
}

/// Advances every reference body by the fixed timestep and resolves ground
/// contact.
fn integrate_bodies_system(
    time: Res<Time>,
    scene: Res<SceneColliders>,
    mut bodies: Query<(&MovementController, &mut SimpleBody)>,
) {
    for (controller, mut body) in &mut bodies {
        body.step(time.delta_secs());
        body.settle(scene.world(), &controller.config().ground);
    }
}

/// Mirrors body position and yaw back onto the player transform.
fn sync_transforms_system(mut players: Query<(&SimpleBody, &mut Transform), With<Player>>) {
    for (body, mut transform) in &mut players {
        transform.translation = body.position();
        transform.rotation = body.rotation();
    }
}

/// Bevy plugin installing the controller systems and resources.
#[derive(Default)]
pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputSnapshot>();
        app.init_resource::<SceneColliders>();
        app.add_systems(
            Update,
            (validate_player_rigs_system, steer_players_system).chain(),
        );
        app.add_systems(
            FixedUpdate,
            (
                drive_players_system,
                integrate_bodies_system,
                sync_transforms_system,
            )
                .chain(),
        );
    }
}
