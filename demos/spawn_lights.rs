//! Spawns a ground plane and three colored cylinder lights into the scene,
//! each rotated about a different axis with `quaternion_from_degrees`.
use std::thread;

use anyhow::Result;
use nalgebra::Vector3;
use structopt::StructOpt;

use rulab::*;

/// Tutorial on spawning colored lights into the scene.
#[derive(StructOpt, Debug)]
#[structopt(name = "spawn_lights")]
struct Arguments {
    /// Run the simulator without a viewport window
    #[structopt(long)]
    headless: bool,
    /// Compute device for the physics engine ("cpu", "cuda" or "cuda:N")
    #[structopt(long, default_value = "cpu")]
    device: Device,
}

fn design_scene(sim: &mut SimulationContext) -> Result<()> {
    sim.spawn_ground_plane("/World/defaultGroundPlane", &GroundPlaneCfg::default())?;

    // One cylinder light per color channel. Cylinder lights shine along
    // their local x-axis, so each one gets a different 90 degree turn.
    let cfg_light = LightCfg {
        kind: LightKind::Cylinder { length: 5.0 },
        intensity: 8000.0,
        color: [1.0, 0.0, 0.0],
    };
    sim.spawn_light(
        "/World/Red_Light",
        &cfg_light,
        SpawnOptions {
            translation: Vector3::new(-1.0, 1.0, 1.5),
            orientation: quaternion_from_degrees(0.0, 0.0, 90.0),
            ..Default::default()
        },
    )?;

    let cfg_light = LightCfg {
        kind: LightKind::Cylinder { length: 5.0 },
        intensity: 3000.0,
        color: [0.0, 1.0, 0.0],
    };
    sim.spawn_light(
        "/World/Green_Light",
        &cfg_light,
        SpawnOptions {
            translation: Vector3::new(-2.0, -2.5, 1.5),
            orientation: quaternion_from_degrees(0.0, 90.0, 0.0),
            ..Default::default()
        },
    )?;

    let cfg_light = LightCfg {
        kind: LightKind::Cylinder { length: 5.0 },
        intensity: 8000.0,
        color: [0.0, 0.0, 1.0],
    };
    sim.spawn_light(
        "/World/Blue_Light",
        &cfg_light,
        SpawnOptions {
            translation: Vector3::new(-3.0, 3.0, 1.5),
            orientation: quaternion_from_degrees(90.0, 0.0, 0.0),
            ..Default::default()
        },
    )?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Arguments::from_args();
    let mode = if args.headless {
        Mode::Headless
    } else {
        Mode::Windowed
    };

    let sim_cfg = SimulationCfg {
        dt: 0.01,
        device: args.device,
        ..Default::default()
    };
    let mut sim = SimulationContext::launch(mode, sim_cfg)?;
    sim.set_camera_view([2.0, 0.0, 2.5], [-0.5, 0.0, 0.5]);

    design_scene(&mut sim)?;

    sim.reset()?;
    println!("[INFO]: Setup complete...");

    for _ in 0..1000 {
        if !sim.is_running() {
            break;
        }
        sim.step()?;
        thread::sleep(sim.physics_dt());
    }
    sim.close();

    Ok(())
}
