//! A teeter-totter built from rigid cuboids. One rider starts far above the
//! seat; continuous collision detection keeps it from tunneling through on
//! the way down.
use std::thread;

use anyhow::Result;
use nalgebra::Vector3;
use structopt::StructOpt;

use rulab::*;

/// Tutorial on spawning rigid bodies with continuous collision detection.
#[derive(StructOpt, Debug)]
#[structopt(name = "teeter_totter")]
struct Arguments {
    /// Run the simulator without a viewport window
    #[structopt(long)]
    headless: bool,
    /// Compute device for the physics engine ("cpu", "cuda" or "cuda:N")
    #[structopt(long, default_value = "cpu")]
    device: Device,
}

/// A colored cuboid with the full set of rigid-body blocks.
fn cuboid(size: [f64; 3], diffuse_color: [f64; 3]) -> ShapeCfg {
    ShapeCfg {
        geometry: Geometry::Cuboid { size },
        visual_material: Some(PreviewSurfaceCfg {
            diffuse_color,
            metallic: 0.2,
            ..Default::default()
        }),
        rigid_props: Some(RigidBodyPropertiesCfg::default()),
        mass_props: Some(MassPropertiesCfg {
            mass: 1.0,
            ..Default::default()
        }),
        collision_props: Some(CollisionPropertiesCfg::default()),
    }
}

fn design_scene(sim: &mut SimulationContext) -> Result<()> {
    sim.spawn_ground_plane("/World/defaultGroundPlane", &GroundPlaneCfg::default())?;

    let cfg_light_distant = LightCfg {
        kind: LightKind::Distant,
        intensity: 3000.0,
        color: [0.75, 0.75, 0.75],
    };
    sim.spawn_light(
        "/World/lightDistant",
        &cfg_light_distant,
        SpawnOptions {
            translation: Vector3::new(1.0, 0.0, 10.0),
            ..Default::default()
        },
    )?;

    sim.create_xform("/World/TeeterTotter")?;

    sim.spawn_rigid_object(&RigidObjectCfg {
        prim_path: "/World/TeeterTotter/Base".to_string(),
        spawn: cuboid([0.5, 0.3, 0.6], [1.0, 0.0, 0.0]),
        init_state: InitialStateCfg::default(),
    })?;

    sim.spawn_rigid_object(&RigidObjectCfg {
        prim_path: "/World/TeeterTotter/Seat".to_string(),
        spawn: cuboid([0.4, 3.8, 0.2], [1.0, 0.0, 0.0]),
        init_state: InitialStateCfg {
            pos: Vector3::new(0.0, 0.0, 0.9),
            ..Default::default()
        },
    })?;

    sim.spawn_rigid_object(&RigidObjectCfg {
        prim_path: "/World/TeeterTotter/CubeRight".to_string(),
        spawn: cuboid([0.4, 0.8, 0.2], [0.0, 1.0, 0.0]),
        init_state: InitialStateCfg {
            pos: Vector3::new(0.0, 1.4, 1.9),
            ..Default::default()
        },
    })?;

    // The left rider drops from high up. Without CCD anything falling from
    // above roughly z = 30 passes straight through the seat between steps.
    sim.spawn_rigid_object(&RigidObjectCfg {
        prim_path: "/World/TeeterTotter/CubeLeft".to_string(),
        spawn: cuboid([0.4, 0.8, 0.2], [0.0, 1.0, 0.0]),
        init_state: InitialStateCfg {
            pos: Vector3::new(0.0, -1.4, 300.9),
            ..Default::default()
        },
    })?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Arguments::from_args();
    let mode = if args.headless {
        Mode::Headless
    } else {
        Mode::Windowed
    };

    let physx = PhysxCfg {
        flags: PhysxFlags::ENABLE_STABILIZATION | PhysxFlags::ENABLE_CCD,
        ..Default::default()
    };
    let sim_cfg = SimulationCfg {
        device: args.device,
        physx,
        ..Default::default()
    };
    let mut sim = SimulationContext::launch(mode, sim_cfg)?;

    // The eye is where the camera actually is, the target is what it looks at.
    sim.set_camera_view([-35.0, 0.0, 30.0], [0.0, 0.0, 0.0]);

    design_scene(&mut sim)?;

    sim.reset()?;
    println!("[INFO]: Setup complete...");

    for _ in 0..2000 {
        if !sim.is_running() {
            break;
        }
        sim.step()?;
        thread::sleep(sim.physics_dt());
    }
    sim.close();

    Ok(())
}
