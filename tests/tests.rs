use nalgebra::Vector3;
use rulab::mode::Mode::{Headless, Windowed};
use rulab::{
    degrees_from_quaternion, quaternion_from_degrees, Device, Geometry, GroundPlaneCfg, LightCfg,
    LightKind, MassPropertiesCfg, RigidObjectCfg, ShapeCfg, SimulationCfg, SimulationContext,
    SpawnOptions,
};

fn float_compare(a: f64, b: f64, thresh: f64) {
    assert!((a - b).abs() < thresh, "{} {}", a, b);
}

fn slice_compare(a: &[f64], b: &[f64], thresh: f64) {
    assert_eq!(a.len(), b.len());
    for i in 0..a.len() {
        float_compare(a[i], b[i], thresh);
    }
}

/// q and -q describe the same rotation.
fn quat_compare_up_to_sign(a: &[f64; 4], b: &[f64; 4], thresh: f64) {
    let direct = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max);
    let flipped = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x + y).abs())
        .fold(0.0, f64::max);
    assert!(direct.min(flipped) < thresh, "{:?} {:?}", a, b);
}

fn quat_norm(q: &[f64; 4]) -> f64 {
    q.iter().map(|c| c * c).sum::<f64>().sqrt()
}

#[test]
fn identity_rotation() {
    let q = quaternion_from_degrees(0.0, 0.0, 0.0);
    slice_compare(&q, &[1.0, 0.0, 0.0, 0.0], 1e-10);
}

#[test]
fn half_turn_about_each_axis() {
    slice_compare(
        &quaternion_from_degrees(180.0, 0.0, 0.0),
        &[0.0, 1.0, 0.0, 0.0],
        1e-9,
    );
    slice_compare(
        &quaternion_from_degrees(0.0, 180.0, 0.0),
        &[0.0, 0.0, 1.0, 0.0],
        1e-9,
    );
    slice_compare(
        &quaternion_from_degrees(0.0, 0.0, 180.0),
        &[0.0, 0.0, 0.0, 1.0],
        1e-9,
    );
}

#[test]
fn quarter_turns_pin_axis_order() {
    let half_sqrt2 = 0.7071067812;
    slice_compare(
        &quaternion_from_degrees(90.0, 0.0, 0.0),
        &[half_sqrt2, half_sqrt2, 0.0, 0.0],
        1e-9,
    );
    slice_compare(
        &quaternion_from_degrees(0.0, 90.0, 0.0),
        &[half_sqrt2, 0.0, half_sqrt2, 0.0],
        1e-9,
    );
    slice_compare(
        &quaternion_from_degrees(0.0, 0.0, 90.0),
        &[half_sqrt2, 0.0, 0.0, half_sqrt2],
        1e-9,
    );
}

#[test]
fn unit_norm_for_finite_angles() {
    let rolls = [-720.0, -163.0, 0.0, 37.5, 90.0, 400.0];
    let pitches = [-90.0, -35.0, 0.0, 52.0, 90.0];
    let yaws = [-153.0, 0.0, 10.0, 270.0];
    for roll in &rolls {
        for pitch in &pitches {
            for yaw in &yaws {
                let q = quaternion_from_degrees(*roll, *pitch, *yaw);
                float_compare(quat_norm(&q), 1.0, 1e-9);
            }
        }
    }
}

#[test]
fn wrap_equivalence_up_to_sign() {
    let q = quaternion_from_degrees(-163.0, -35.0, -153.0);
    let p = quaternion_from_degrees(-163.0 + 360.0, -35.0, -153.0);
    quat_compare_up_to_sign(&q, &p, 1e-9);

    let q = quaternion_from_degrees(10.0, 20.0, 30.0);
    let p = quaternion_from_degrees(10.0, 20.0 - 720.0, 30.0);
    quat_compare_up_to_sign(&q, &p, 1e-9);
}

#[test]
fn euler_round_trip() {
    let q = quaternion_from_degrees(-163.0, -35.0, -153.0);
    let (roll, pitch, yaw) = degrees_from_quaternion(q);
    let p = quaternion_from_degrees(roll, pitch, yaw);
    quat_compare_up_to_sign(&q, &p, 1e-8);
}

#[test]
fn euler_round_trip_near_gimbal_lock() {
    // At pitch = 90 the recovered roll and yaw are coupled and may differ
    // from the inputs, but the rotation itself must survive the trip.
    let q = quaternion_from_degrees(25.0, 90.0, -40.0);
    float_compare(quat_norm(&q), 1.0, 1e-9);
    let (roll, pitch, yaw) = degrees_from_quaternion(q);
    let p = quaternion_from_degrees(roll, pitch, yaw);
    quat_compare_up_to_sign(&q, &p, 1e-7);
}

#[test]
fn components_rounded_to_ten_decimals() {
    let q = quaternion_from_degrees(-163.0, -35.0, -153.0);
    for component in &q {
        let rerounded = (component * 1e10).round() / 1e10;
        assert_eq!(rerounded, *component);
    }
}

#[test]
fn test_launch_headless() {
    let sim = SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();
    assert!(sim.is_running());
    assert!(matches!(sim.mode(), Headless));
    assert_eq!(sim.prim_count(), 0);
}

#[test]
fn invalid_simulation_cfg_rejected() {
    let cfg = SimulationCfg {
        dt: 0.0,
        ..Default::default()
    };
    assert!(SimulationContext::launch(Headless, cfg).is_err());

    let cfg = SimulationCfg {
        dt: f64::NAN,
        ..Default::default()
    };
    assert!(SimulationContext::launch(Headless, cfg).is_err());

    let cfg = SimulationCfg {
        gravity: Vector3::new(0.0, 0.0, f64::NEG_INFINITY),
        ..Default::default()
    };
    assert!(SimulationContext::launch(Headless, cfg).is_err());
}

#[test]
fn spawn_creates_missing_ancestors() {
    let mut sim = SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();
    let cone = sim
        .spawn_shape(
            "/World/Objects/Cone1",
            &ShapeCfg::new(Geometry::Cone {
                radius: 0.15,
                height: 0.5,
            }),
            SpawnOptions::default(),
        )
        .unwrap();
    assert!(sim.has_prim("/World"));
    assert!(sim.has_prim("/World/Objects"));
    assert_eq!(sim.prim_count(), 3);
    assert_eq!(sim.prim_path(cone), Some("/World/Objects/Cone1"));
}

#[test]
fn duplicate_path_rejected() {
    let mut sim = SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();
    sim.spawn_ground_plane("/World/defaultGroundPlane", &GroundPlaneCfg::default())
        .unwrap();
    assert!(sim
        .spawn_ground_plane("/World/defaultGroundPlane", &GroundPlaneCfg::default())
        .is_err());
}

#[test]
fn invalid_paths_rejected() {
    let mut sim = SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();
    for path in &[
        "World/Objects",
        "/",
        "/World/",
        "/World//Cone",
        "/World/1Cone",
        "/World/Co ne",
        "",
    ] {
        assert!(sim.create_xform(path).is_err(), "accepted '{}'", path);
    }
    assert_eq!(sim.prim_count(), 0);
}

#[test]
fn step_requires_reset() {
    let cfg = SimulationCfg {
        dt: 0.01,
        ..Default::default()
    };
    let mut sim = SimulationContext::launch(Headless, cfg).unwrap();
    assert!(sim.step().is_err());

    sim.reset().unwrap();
    for _ in 0..3 {
        sim.step().unwrap();
    }
    assert_eq!(sim.step_count(), 3);
    float_compare(sim.sim_time().as_secs_f64(), 0.03, 1e-9);
}

#[test]
fn close_stops_the_app() {
    let mut sim = SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();
    sim.reset().unwrap();
    sim.close();
    assert!(!sim.is_running());
    assert!(sim.step().is_err());
    assert!(sim.create_xform("/World/Objects").is_err());
    // closing twice is fine
    sim.close();
}

#[test]
fn light_scale_rejected() {
    let mut sim = SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();
    let cfg_light = LightCfg {
        kind: LightKind::Cylinder { length: 5.0 },
        intensity: 8000.0,
        color: [1.0, 0.0, 0.0],
    };
    assert!(sim
        .spawn_light(
            "/World/Red_Light",
            &cfg_light,
            SpawnOptions {
                scale: Some([1.0, 1.0, 2.0]),
                ..Default::default()
            },
        )
        .is_err());
    // without scale the same light spawns fine
    sim.spawn_light("/World/Red_Light", &cfg_light, SpawnOptions::default())
        .unwrap();
}

#[test]
fn bad_spawn_orientation_rejected() {
    let mut sim = SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();
    let cfg = ShapeCfg::new(Geometry::Sphere { radius: 1.0 });

    assert!(sim
        .spawn_shape(
            "/World/Sphere",
            &cfg,
            SpawnOptions {
                orientation: [0.0, 0.0, 0.0, 0.0],
                ..Default::default()
            },
        )
        .is_err());
    assert!(sim
        .spawn_shape(
            "/World/Sphere",
            &cfg,
            SpawnOptions {
                orientation: [f64::NAN, 0.0, 0.0, 0.0],
                ..Default::default()
            },
        )
        .is_err());
    // a non-normalized orientation is normalized, not rejected
    sim.spawn_shape(
        "/World/Sphere",
        &cfg,
        SpawnOptions {
            orientation: [2.0, 0.0, 0.0, 0.0],
            ..Default::default()
        },
    )
    .unwrap();
}

#[test]
fn geometry_must_be_positive() {
    let mut sim = SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();
    let bad_shapes = [
        Geometry::Cone {
            radius: -1.0,
            height: 0.5,
        },
        Geometry::Cuboid {
            size: [1.0, 0.0, 1.0],
        },
        Geometry::Sphere { radius: f64::NAN },
        Geometry::Cylinder {
            radius: 1.0,
            height: 0.0,
        },
    ];
    for geometry in bad_shapes {
        let cfg = ShapeCfg::new(geometry);
        assert!(sim
            .spawn_shape("/World/Shape", &cfg, SpawnOptions::default())
            .is_err());
    }
}

#[test]
fn rigid_object_initial_state_checked() {
    let mut sim = SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();

    let cuboid = |prim_path: &str| RigidObjectCfg {
        prim_path: prim_path.to_string(),
        spawn: ShapeCfg {
            mass_props: Some(MassPropertiesCfg::default()),
            ..ShapeCfg::new(Geometry::Cuboid {
                size: [0.4, 0.8, 0.2],
            })
        },
        init_state: Default::default(),
    };

    sim.spawn_rigid_object(&cuboid("/World/CubeRight")).unwrap();

    let mut bad = cuboid("/World/CubeLeft");
    bad.init_state.rot = [0.0, 0.0, 0.0, 0.0];
    assert!(sim.spawn_rigid_object(&bad).is_err());

    let mut bad = cuboid("/World/CubeLeft");
    bad.init_state.pos = Vector3::new(f64::NAN, 0.0, 0.0);
    assert!(sim.spawn_rigid_object(&bad).is_err());

    let mut bad = cuboid("/World/CubeLeft");
    bad.spawn.mass_props = Some(MassPropertiesCfg {
        mass: 0.0,
        ..Default::default()
    });
    assert!(sim.spawn_rigid_object(&bad).is_err());
}

#[test]
fn camera_view_is_stored() {
    let mut sim = SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();
    assert!(sim.camera_view().is_none());
    sim.set_camera_view([2.0, 0.0, 2.5], [-0.5, 0.0, 0.5]);
    let (eye, target) = sim.camera_view().unwrap();
    slice_compare(&eye, &[2.0, 0.0, 2.5], 1e-12);
    slice_compare(&target, &[-0.5, 0.0, 0.5], 1e-12);
}

#[test]
fn windowed_app_is_exclusive() {
    let first = SimulationContext::launch(Windowed, SimulationCfg::default()).unwrap();
    assert!(SimulationContext::launch(Windowed, SimulationCfg::default()).is_err());
    // headless launches are not limited
    SimulationContext::launch(Headless, SimulationCfg::default()).unwrap();

    drop(first);
    SimulationContext::launch(Windowed, SimulationCfg::default()).unwrap();
}

#[test]
fn device_strings() {
    assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
    assert_eq!(
        "cuda".parse::<Device>().unwrap(),
        Device::Cuda { ordinal: None }
    );
    assert_eq!(
        "cuda:1".parse::<Device>().unwrap(),
        Device::Cuda { ordinal: Some(1) }
    );
    assert!("".parse::<Device>().is_err());
    assert!("tpu".parse::<Device>().is_err());
    assert!("cuda:x".parse::<Device>().is_err());
    assert_eq!(format!("{}", Device::Cuda { ordinal: Some(1) }), "cuda:1");
}
