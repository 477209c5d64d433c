//! First-person capsule character controller.
//!
//! The core is engine-agnostic: [`MovementController`] blends an
//! [`InputSnapshot`] into a movement force across a variable-rate and a
//! fixed-rate phase, probing the injected [`collision::CollisionWorld`] for
//! ground, stairs and slopes, and steering the injected
//! [`body::PhysicsBody`]. The [`plugin::ControllerPlugin`] hosts the core in
//! a Bevy schedule, and `BoxWorld`/`SimpleBody` are reference collaborators
//! for tests and the demo binary.
pub mod body;
pub mod collision;
pub mod constants;
pub mod controller;
pub mod ground;
pub mod input;
pub mod logging;
pub mod options;
pub mod overlay;
pub mod plugin;
pub mod regulator;
pub mod slopes;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use body::{ForceMode, PhysicsBody, PitchPivot, SimpleBody};
pub use collision::{BoxWorld, CollisionWorld, LayerMask, RayHit};
pub use controller::{ConfigError, ControllerConfig, MovementController};
pub use ground::{GroundEdge, GroundProbe, GroundProbeSettings, GroundSensor};
pub use input::InputSnapshot;
pub use logging::init as init_logging;
pub use options::{FullscreenMode, GameOptions, OptionsError};
pub use plugin::{spawn_player, ControllerPlugin, SceneColliders};
pub use regulator::VelocityRegulator;
pub use slopes::{SlopeStairNegotiator, StairSlopeSettings, StepOutcome};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use strider::prelude::*;
    //! ```

    pub use crate::body::{ForceMode, PhysicsBody, PitchPivot, SimpleBody};
    pub use crate::collision::{BoxWorld, CollisionWorld, LayerMask};
    pub use crate::controller::{ControllerConfig, MovementController};
    pub use crate::ground::GroundEdge;
    pub use crate::input::InputSnapshot;
    pub use crate::plugin::{spawn_player, ControllerPlugin, SceneColliders};
}
