//! Spawns a red cone and attaches a disk light beneath its prim path.
use std::thread;

use anyhow::Result;
use nalgebra::Vector3;
use structopt::StructOpt;

use rulab::*;

/// Tutorial on attaching a light to another prim.
#[derive(StructOpt, Debug)]
#[structopt(name = "attach_light")]
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

    // Grouping prim for everything spawned below.
    sim.create_xform("/World/Objects")?;

    let cone_path = "/World/Objects/Cone1";
    let cfg_cone = ShapeCfg {
        visual_material: Some(PreviewSurfaceCfg {
            diffuse_color: [1.0, 0.0, 0.0],
            ..Default::default()
        }),
        ..ShapeCfg::new(Geometry::Cone {
            radius: 0.15,
            height: 0.5,
        })
    };
    sim.spawn_shape(
        cone_path,
        &cfg_cone,
        SpawnOptions {
            translation: Vector3::new(-2.0, 1.0, 0.0),
            ..Default::default()
        },
    )?;

    // Lights parent like any other prim, so the light follows the cone.
    let light_path = format!("{}/PointLight", cone_path);
    let cfg_light = LightCfg {
        kind: LightKind::Disk { radius: 1.5 },
        intensity: 8000.0,
        color: [1.0, 0.0, 0.0],
    };
    sim.spawn_light(
        &light_path,
        &cfg_light,
        SpawnOptions {
            translation: Vector3::new(0.0, 1.0, 1.5),
            ..Default::default()
        },
    )?;
    println!("[INFO] Light attached to {}", cone_path);

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
