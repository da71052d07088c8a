//! A Rust interface for authoring Isaac-Lab-style simulation scenes.
//!
//! The physics engine, renderer and stage live on the other side of the
//! simulator application's API boundary; this crate covers the client side
//! of it: typed spawn configurations, launch modes, the
//! [`SimulationContext`](`SimulationContext`) that drives the step loop, and
//! the degree-based rotation helpers the scene scripts lean on.

pub use crate::{
    client::SimulationContext,
    error::Error,
    math::{degrees_from_quaternion, quaternion_from_degrees},
    mode::{Device, Mode},
    types::{
        CollisionPropertiesCfg, Geometry, GroundPlaneCfg, InitialStateCfg, LightCfg, LightKind,
        MassPropertiesCfg, PhysxCfg, PhysxFlags, PreviewSurfaceCfg, PrimId,
        RigidBodyPropertiesCfg, RigidObjectCfg, ShapeCfg, SimulationCfg, SpawnOptions,
    },
};

pub mod client;
pub mod error;
pub mod math;
pub mod mode;
pub mod types;
