//! Configuration objects for the prims a scene script spawns.
//!
//! These mirror the spawn configurations the simulator's scripting layer
//! accepts: plain data with defaults, handed to the
//! [`SimulationContext`](`crate::SimulationContext`) spawn methods. The
//! engine interprets them; the client only checks that the values can cross
//! the boundary at all.

use bitflags::bitflags;
use nalgebra::Vector3;

use crate::mode::Device;
use crate::Error;

/// The unique ID for a prim within a simulation stage.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PrimId(pub(crate) usize);

bitflags! {
    /// Feature toggles forwarded to the PhysX backend.
    pub struct PhysxFlags: u32 {
        /// Continuous collision detection. Needed for small or fast bodies
        /// that would otherwise tunnel through thin geometry between steps.
        const ENABLE_CCD = 0b001;
        /// Extra solver passes that damp jitter in resting contacts.
        const ENABLE_STABILIZATION = 0b010;
        /// Bitwise-identical results across runs at some simulation cost.
        const ENHANCED_DETERMINISM = 0b100;
    }
}

/// Settings for the PhysX backend.
pub struct PhysxCfg {
    pub flags: PhysxFlags,
    /// solver iterations spent on position error per step
    pub solver_position_iteration_count: u32,
    /// solver iterations spent on velocity error per step
    pub solver_velocity_iteration_count: u32,
}

impl Default for PhysxCfg {
    fn default() -> PhysxCfg {
        PhysxCfg {
            flags: PhysxFlags::ENABLE_STABILIZATION,
            solver_position_iteration_count: 4,
            solver_velocity_iteration_count: 1,
        }
    }
}

/// Top-level simulation settings, passed to
/// [`SimulationContext::launch`](`crate::SimulationContext::launch`).
pub struct SimulationCfg {
    /// Physics step size in seconds. The solver parameters are tuned around
    /// the default; if you change it, retune the iteration counts in
    /// [`PhysxCfg`](`PhysxCfg`) as well.
    pub dt: f64,
    /// Device the physics engine runs on.
    pub device: Device,
    /// Gravity vector in m/s².
    pub gravity: Vector3<f64>,
    pub physx: PhysxCfg,
}

impl Default for SimulationCfg {
    fn default() -> SimulationCfg {
        SimulationCfg {
            dt: 1.0 / 60.0,
            device: Device::default(),
            gravity: Vector3::new(0.0, 0.0, -9.81),
            physx: PhysxCfg::default(),
        }
    }
}

impl SimulationCfg {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(Error::new("physics dt must be finite and positive"));
        }
        if !(self.gravity.x.is_finite() && self.gravity.y.is_finite() && self.gravity.z.is_finite())
        {
            return Err(Error::new("gravity must be finite"));
        }
        if self.physx.solver_position_iteration_count == 0 {
            return Err(Error::new("solver position iteration count must be at least 1"));
        }
        Ok(())
    }
}

/// Geometry of a spawnable shape prim.
pub enum Geometry {
    /// A cone with its apex on the +z axis.
    Cone {
        /// radius of the base in meter
        radius: f64,
        /// height in meter
        height: f64,
    },
    /// A Cuboid
    Cuboid {
        /// [x,y,z] edge lengths in meter. For example [1.,1.,1.] is a unit cube.
        size: [f64; 3],
    },
    /// A Sphere determined by the radius in meter
    Sphere {
        /// radius in meter
        radius: f64,
    },
    /// A Cylinder
    Cylinder {
        /// radius in meter
        radius: f64,
        /// height in meter
        height: f64,
    },
}

impl Geometry {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let ok = match self {
            Geometry::Cone { radius, height } => is_dimension(*radius) && is_dimension(*height),
            Geometry::Cuboid { size } => size.iter().all(|d| is_dimension(*d)),
            Geometry::Sphere { radius } => is_dimension(*radius),
            Geometry::Cylinder { radius, height } => is_dimension(*radius) && is_dimension(*height),
        };
        if ok {
            Ok(())
        } else {
            Err(Error::new("shape dimensions must be finite and positive"))
        }
    }
}

fn is_dimension(d: f64) -> bool {
    d.is_finite() && d > 0.0
}

/// A simple PBR material for visual shapes.
pub struct PreviewSurfaceCfg {
    /// color components for red, green and blue, each in range [0,1]
    pub diffuse_color: [f64; 3],
    pub emissive_color: [f64; 3],
    pub roughness: f64,
    pub metallic: f64,
    pub opacity: f64,
}

impl Default for PreviewSurfaceCfg {
    fn default() -> PreviewSurfaceCfg {
        PreviewSurfaceCfg {
            diffuse_color: [0.18; 3],
            emissive_color: [0.0; 3],
            roughness: 0.5,
            metallic: 0.0,
            opacity: 1.0,
        }
    }
}

/// Rigid-body solver settings for a shape prim.
pub struct RigidBodyPropertiesCfg {
    /// Drives the body from its transform instead of the solver.
    pub kinematic_enabled: bool,
    /// Exempts the body from the global gravity vector.
    pub disable_gravity: bool,
    pub linear_damping: f64,
    pub angular_damping: f64,
    /// Cap on the velocity the solver may use to push overlapping bodies
    /// apart, in m/s.
    pub max_depenetration_velocity: f64,
}

impl Default for RigidBodyPropertiesCfg {
    fn default() -> RigidBodyPropertiesCfg {
        RigidBodyPropertiesCfg {
            kinematic_enabled: false,
            disable_gravity: false,
            linear_damping: 0.0,
            angular_damping: 0.05,
            max_depenetration_velocity: 1.0,
        }
    }
}

/// Mass settings for a shape prim.
pub struct MassPropertiesCfg {
    /// mass of the body, in kg (if using SI units)
    pub mass: f64,
    /// Density in kg/m³. When set, the engine derives the mass from the
    /// collision volume and `mass` is ignored.
    pub density: Option<f64>,
}

impl Default for MassPropertiesCfg {
    fn default() -> MassPropertiesCfg {
        MassPropertiesCfg {
            mass: 1.0,
            density: None,
        }
    }
}

impl MassPropertiesCfg {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(Error::new("mass must be finite and positive"));
        }
        if let Some(density) = self.density {
            if !density.is_finite() || density <= 0.0 {
                return Err(Error::new("density must be finite and positive"));
            }
        }
        Ok(())
    }
}

/// Collider settings for a shape prim.
pub struct CollisionPropertiesCfg {
    pub collision_enabled: bool,
    /// Distance at which contacts start being generated, in meter.
    pub contact_offset: f64,
    /// Distance at which bodies come to rest relative to each other, in meter.
    pub rest_offset: f64,
}

impl Default for CollisionPropertiesCfg {
    fn default() -> CollisionPropertiesCfg {
        CollisionPropertiesCfg {
            collision_enabled: true,
            contact_offset: 0.02,
            rest_offset: 0.0,
        }
    }
}

/// Everything needed to spawn a shape prim: its geometry plus optional
/// visual and physics blocks. Leaving a block `None` leaves the concern to
/// the engine defaults (a shape without physics blocks is purely visual).
pub struct ShapeCfg {
    pub geometry: Geometry,
    pub visual_material: Option<PreviewSurfaceCfg>,
    pub rigid_props: Option<RigidBodyPropertiesCfg>,
    pub mass_props: Option<MassPropertiesCfg>,
    pub collision_props: Option<CollisionPropertiesCfg>,
}

impl ShapeCfg {
    /// A bare shape with the given geometry and no visual or physics blocks.
    pub fn new(geometry: Geometry) -> ShapeCfg {
        ShapeCfg {
            geometry,
            visual_material: None,
            rigid_props: None,
            mass_props: None,
            collision_props: None,
        }
    }
}

/// The static collision plane most scenes start with.
pub struct GroundPlaneCfg {
    /// [x,y] extents in meter
    pub size: [f64; 2],
    pub color: [f64; 3],
}

impl Default for GroundPlaneCfg {
    fn default() -> GroundPlaneCfg {
        GroundPlaneCfg {
            size: [100.0, 100.0],
            color: [0.065, 0.0725, 0.08],
        }
    }
}

impl GroundPlaneCfg {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.size.iter().any(|d| !is_dimension(*d)) {
            return Err(Error::new("ground plane size must be finite and positive"));
        }
        Ok(())
    }
}

/// The luminous geometry of a light prim.
pub enum LightKind {
    /// Light emitted from the surface of a cylinder, aligned with its local
    /// x-axis.
    Cylinder {
        /// length in meter
        length: f64,
    },
    /// Light emitted from a flat disk, along its local -z axis.
    Disk {
        /// radius in meter
        radius: f64,
    },
    /// Parallel rays from infinitely far away, like the sun. Position is
    /// irrelevant, only the orientation matters.
    Distant,
}

/// A light prim.
///
/// Note that the engine does not expose geometric scale for light prims;
/// spawning a light with [`SpawnOptions::scale`](`SpawnOptions`) set is an
/// error.
pub struct LightCfg {
    pub kind: LightKind,
    /// luminous intensity in candela
    pub intensity: f64,
    pub color: [f64; 3],
}

impl LightCfg {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        match &self.kind {
            LightKind::Cylinder { length } if !length.is_finite() || *length <= 0.0 => {
                return Err(Error::new("cylinder light length must be finite and positive"));
            }
            LightKind::Disk { radius } if !radius.is_finite() || *radius <= 0.0 => {
                return Err(Error::new("disk light radius must be finite and positive"));
            }
            _ => {}
        }
        if !self.intensity.is_finite() || self.intensity < 0.0 {
            return Err(Error::new("light intensity must be finite and non-negative"));
        }
        Ok(())
    }
}

/// Placement of a prim relative to its parent.
pub struct SpawnOptions {
    /// translation in meter
    pub translation: Vector3<f64>,
    /// Orientation as (w, x, y, z) with the scalar component first, as
    /// produced by
    /// [`quaternion_from_degrees`](`crate::math::quaternion_from_degrees`).
    /// It does not need to be normalized; the client normalizes it before it
    /// crosses the engine boundary.
    pub orientation: [f64; 4],
    /// Per-axis geometric scale. `None` keeps the authored size.
    pub scale: Option<[f64; 3]>,
}

impl Default for SpawnOptions {
    fn default() -> SpawnOptions {
        SpawnOptions {
            translation: Vector3::new(0.0, 0.0, 0.0),
            orientation: [1.0, 0.0, 0.0, 0.0],
            scale: None,
        }
    }
}

/// Pose and velocities a rigid object starts the simulation with.
pub struct InitialStateCfg {
    /// position in meter
    pub pos: Vector3<f64>,
    /// orientation as (w, x, y, z)
    pub rot: [f64; 4],
    /// linear velocity in m/s
    pub lin_vel: Vector3<f64>,
    /// angular velocity in rad/s
    pub ang_vel: Vector3<f64>,
}

impl Default for InitialStateCfg {
    fn default() -> InitialStateCfg {
        InitialStateCfg {
            pos: Vector3::new(0.0, 0.0, 0.0),
            rot: [1.0, 0.0, 0.0, 0.0],
            lin_vel: Vector3::new(0.0, 0.0, 0.0),
            ang_vel: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

/// A shape spawned as a simulated rigid body with an initial state.
pub struct RigidObjectCfg {
    /// Absolute prim path the object is spawned at.
    pub prim_path: String,
    pub spawn: ShapeCfg,
    pub init_state: InitialStateCfg,
}
