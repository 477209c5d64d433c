//! Headless demo: walks a scripted player through a small boxed scene.

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use glam::{Quat, Vec3};
use log::{debug, info};

use strider::overlay::probe_lines;
use strider::{
    init_logging, BoxWorld, ControllerConfig, GameOptions, InputSnapshot, LayerMask,
    MovementController, PhysicsBody, PitchPivot, SimpleBody,
};

/// A first-person capsule character controller
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Number of fixed ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,
}

/// Stand-in camera pivot that just remembers its rotation.
struct DemoPivot(Quat);

impl PitchPivot for DemoPivot {
    fn set_local_rotation(&mut self, rotation: Quat) {
        self.0 = rotation;
    }
}

/// Floor, a three-step staircase, a plateau behind it and a blocking wall.
fn build_scene() -> BoxWorld {
    let mut world = BoxWorld::new();
    world
        .add_box(
            Vec3::new(-50.0, -1.0, -50.0),
            Vec3::new(50.0, 0.0, 50.0),
            LayerMask::GROUND,
        )
        .add_box(
            Vec3::new(5.0, 0.0, -3.0),
            Vec3::new(6.0, 0.25, 3.0),
            LayerMask::GROUND,
        )
        .add_box(
            Vec3::new(6.0, 0.0, -3.0),
            Vec3::new(7.0, 0.5, 3.0),
            LayerMask::GROUND,
        )
        .add_box(
            Vec3::new(7.0, 0.0, -3.0),
            Vec3::new(8.0, 0.75, 3.0),
            LayerMask::GROUND,
        )
        .add_box(
            Vec3::new(8.0, 0.0, -3.0),
            Vec3::new(12.0, 0.75, 3.0),
            LayerMask::GROUND,
        )
        .add_box(
            Vec3::new(14.0, 0.0, -10.0),
            Vec3::new(15.0, 4.0, 10.0),
            LayerMask::GROUND,
        );
    world
}

/// Scripted input: walk toward the stairs, hop once, then sprint.
fn input_for(tick: u32, options: &GameOptions) -> InputSnapshot {
    let mut input = InputSnapshot::moving(Vec3::X);
    input.invert_look_x = options.invert_look_x;
    input.invert_look_y = options.invert_look_y;
    input.look_sensitivity_x = options.look_sensitivity_x;
    input.look_sensitivity_y = options.look_sensitivity_y;
    if tick == 120 {
        input.jump = true;
    }
    input.jump_hold = (120..150).contains(&tick);
    input.sprint = tick >= 300;
    input
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = GameOptions::load_or_default(Path::new("settings.ini"))?;
    debug!("options: {options:?}");

    let world = build_scene();
    let mut controller = MovementController::new(ControllerConfig::default())?;
    let mut body = SimpleBody::new(Vec3::new(0.0, 0.0, 0.0));
    let mut pivot = DemoPivot(Quat::IDENTITY);

    const DT: f32 = 1.0 / 60.0;
    for tick in 0..args.ticks {
        let input = input_for(tick, &options);
        controller.update(&input, &mut body, DT);
        controller.fixed_update(&mut body, &mut pivot, &world);
        body.step(DT);
        body.settle(&world, &controller.config().ground);

        for edge in controller.take_ground_events() {
            info!("tick {tick}: ground edge {edge:?}");
        }
        if tick % 60 == 0 {
            let p = body.position();
            info!(
                "t={:5.2}s pos=({:6.2}, {:5.2}, {:6.2}) grounded={} sprinting={} speed={:.2}",
                f64::from(tick) * f64::from(DT),
                p.x,
                p.y,
                p.z,
                controller.is_grounded(),
                controller.is_sprinting(),
                body.velocity().length()
            );
            for line in probe_lines(p, &controller.config().ground, &controller.last_probe()) {
                debug!("probe {:?} -> {:?} hit={}", line.start, line.end, line.hit);
            }
        }
    }

    info!("simulation finished after {} ticks", args.ticks);
    Ok(())
}
