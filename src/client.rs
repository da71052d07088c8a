//! The simulation context.
//!
//! This is modeled after the scripting surface the simulator application
//! exposes: one handle that launches the app, spawns prims into the stage
//! and drives the step loop. Physics, rendering and everything else that
//! happens behind the engine boundary stays there; the context owns only
//! the client-side bookkeeping needed to hand the engine a well-formed
//! scene.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info};
use nalgebra::Vector3;

use self::window_marker::WindowMarker;
use crate::math;
use crate::types::{
    GroundPlaneCfg, LightCfg, PrimId, RigidObjectCfg, ShapeCfg, SimulationCfg, SpawnOptions,
};
use crate::{Error, Mode};

#[derive(Debug, Clone, Copy)]
enum PrimKind {
    Xform,
    GroundPlane,
    Shape,
    Light,
}

#[derive(Debug, Clone, Copy)]
struct CameraView {
    eye: [f64; 3],
    target: [f64; 3],
}

/// Handle to a running simulator application.
///
/// The usual life of a context mirrors the scene scripts: launch, author the
/// scene with the spawn methods, [`reset`](`Self::reset()`), then call
/// [`step`](`Self::step()`) in a loop until done and
/// [`close`](`Self::close()`).
pub struct SimulationContext {
    cfg: SimulationCfg,
    mode: Mode,
    /// Paths of every prim on the stage, indexed by [`PrimId`](`PrimId`).
    prims: Vec<String>,
    paths: HashMap<String, PrimId>,
    camera: Option<CameraView>,
    sim_time: f64,
    step_count: u64,
    playing: bool,
    running: bool,

    /// Held for as long as this context occupies the process-wide window slot.
    _window_marker: Option<WindowMarker>,
}

impl SimulationContext {
    /// Launches the simulator application.
    ///
    /// Fails if the configuration cannot be handed to the engine or, for
    /// [`Mode::Windowed`](`Mode`) and [`Mode::Livestream`](`Mode`), if
    /// another interactive application is already running in this process.
    /// Headless launches are not limited.
    pub fn launch(mode: Mode, cfg: SimulationCfg) -> Result<SimulationContext, Error> {
        cfg.validate()?;

        let window_marker = match mode {
            Mode::Headless => None,
            Mode::Windowed | Mode::Livestream { .. } => Some(WindowMarker::acquire()?),
        };

        info!(
            "launching simulator app in {:?} mode on {} (dt: {} s)",
            mode, cfg.device, cfg.dt
        );

        Ok(SimulationContext {
            cfg,
            mode,
            prims: Vec::new(),
            paths: HashMap::new(),
            camera: None,
            sim_time: 0.0,
            step_count: 0,
            playing: false,
            running: true,
            _window_marker: window_marker,
        })
    }

    /// Points the viewport camera.
    ///
    /// # Arguments
    /// * `eye` - where the camera sits.
    /// * `target` - what the camera looks at.
    pub fn set_camera_view(&mut self, eye: [f64; 3], target: [f64; 3]) {
        self.camera = Some(CameraView { eye, target });
    }

    /// The camera pose last set with [`set_camera_view`](`Self::set_camera_view()`).
    pub fn camera_view(&self) -> Option<([f64; 3], [f64; 3])> {
        self.camera.map(|camera| (camera.eye, camera.target))
    }

    /// Creates an empty transform prim, typically used to group other prims
    /// spawned beneath its path.
    pub fn create_xform(&mut self, path: &str) -> Result<PrimId, Error> {
        self.check_running()?;
        self.register(path, PrimKind::Xform)
    }

    /// Spawns the static collision plane most scenes start with.
    pub fn spawn_ground_plane(
        &mut self,
        path: &str,
        cfg: &GroundPlaneCfg,
    ) -> Result<PrimId, Error> {
        self.check_running()?;
        cfg.validate()?;
        self.register(path, PrimKind::GroundPlane)
    }

    /// Spawns a shape prim at `path`.
    pub fn spawn_shape(
        &mut self,
        path: &str,
        cfg: &ShapeCfg,
        options: SpawnOptions,
    ) -> Result<PrimId, Error> {
        self.check_running()?;
        cfg.geometry.validate()?;
        if let Some(mass_props) = &cfg.mass_props {
            mass_props.validate()?;
        }
        check_placement(&options)?;
        self.register(path, PrimKind::Shape)
    }

    /// Spawns a light prim at `path`.
    ///
    /// The engine does not expose geometric scale for light prims, so
    /// `options.scale` must be `None`.
    pub fn spawn_light(
        &mut self,
        path: &str,
        cfg: &LightCfg,
        options: SpawnOptions,
    ) -> Result<PrimId, Error> {
        self.check_running()?;
        cfg.validate()?;
        if options.scale.is_some() {
            return Err(Error::new(
                "the engine does not expose geometric scale for light prims",
            ));
        }
        check_placement(&options)?;
        self.register(path, PrimKind::Light)
    }

    /// Spawns a shape as a simulated rigid body with an initial state.
    pub fn spawn_rigid_object(&mut self, cfg: &RigidObjectCfg) -> Result<PrimId, Error> {
        self.check_running()?;
        cfg.spawn.geometry.validate()?;
        if let Some(mass_props) = &cfg.spawn.mass_props {
            mass_props.validate()?;
        }

        let state = &cfg.init_state;
        math::unit_quaternion_from_wxyz(state.rot)?;
        let finite = |v: &Vector3<f64>| v.x.is_finite() && v.y.is_finite() && v.z.is_finite();
        if !(finite(&state.pos) && finite(&state.lin_vel) && finite(&state.ang_vel)) {
            return Err(Error::new("rigid object initial state must be finite"));
        }

        self.register(&cfg.prim_path, PrimKind::Shape)
    }

    /// Resets the engine to the authored scene and starts playing.
    ///
    /// Must be called once the scene is designed and before the first
    /// [`step`](`Self::step()`); stepping a stopped simulation is an error.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.check_running()?;
        self.playing = true;
        self.sim_time = 0.0;
        self.step_count = 0;
        info!("simulation reset, {} prims on the stage", self.prims.len());
        Ok(())
    }

    /// Performs one forward step of the simulation.
    pub fn step(&mut self) -> Result<(), Error> {
        self.check_running()?;
        if !self.playing {
            return Err(Error::new("simulation must be reset before stepping"));
        }
        self.sim_time += self.cfg.dt;
        self.step_count += 1;
        Ok(())
    }

    /// Whether the application is still running. Returns `false` once
    /// [`close`](`Self::close()`) has been called.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The physics step size.
    pub fn physics_dt(&self) -> Duration {
        Duration::from_secs_f64(self.cfg.dt)
    }

    /// Simulated time accumulated since the last [`reset`](`Self::reset()`).
    pub fn sim_time(&self) -> Duration {
        Duration::from_secs_f64(self.sim_time)
    }

    /// Steps taken since the last [`reset`](`Self::reset()`).
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// The mode the application was launched in.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of prims on the stage, implicitly created ancestors included.
    pub fn prim_count(&self) -> usize {
        self.prims.len()
    }

    /// Whether a prim exists at `path`.
    pub fn has_prim(&self, path: &str) -> bool {
        self.paths.contains_key(path)
    }

    /// The path a prim was spawned at.
    pub fn prim_path(&self, id: PrimId) -> Option<&str> {
        self.prims.get(id.0).map(|path| path.as_str())
    }

    /// Shuts the application down. Spawning and stepping fail afterwards.
    pub fn close(&mut self) {
        if self.running {
            info!("closing simulator app after {} steps", self.step_count);
        }
        self.running = false;
        self.playing = false;
        self._window_marker = None;
    }

    fn check_running(&self) -> Result<(), Error> {
        if !self.running {
            return Err(Error::new("simulator application has been closed"));
        }
        Ok(())
    }

    fn register(&mut self, path: &str, kind: PrimKind) -> Result<PrimId, Error> {
        validate_path(path)?;
        if self.paths.contains_key(path) {
            return Err(Error::with(format!("a prim already exists at '{}'", path)));
        }

        // Missing ancestors come into existence as plain transforms, the way
        // the engine's stage defines them.
        for (index, character) in path.char_indices().skip(1) {
            if character == '/' {
                let ancestor = &path[..index];
                if !self.paths.contains_key(ancestor) {
                    self.insert(ancestor, PrimKind::Xform);
                }
            }
        }

        Ok(self.insert(path, kind))
    }

    fn insert(&mut self, path: &str, kind: PrimKind) -> PrimId {
        let id = PrimId(self.prims.len());
        debug!("created {:?} prim at '{}'", kind, path);
        self.paths.insert(path.to_string(), id);
        self.prims.push(path.to_string());
        id
    }
}

fn check_placement(options: &SpawnOptions) -> Result<(), Error> {
    let translation = &options.translation;
    if !(translation.x.is_finite() && translation.y.is_finite() && translation.z.is_finite()) {
        return Err(Error::new("spawn translation must be finite"));
    }

    math::unit_quaternion_from_wxyz(options.orientation)?;

    if let Some(scale) = &options.scale {
        if scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(Error::new("spawn scale must be finite and positive"));
        }
    }
    Ok(())
}

/// Prim paths are absolute and made of identifier-like segments, e.g.
/// `/World/Objects/Cone1`.
fn validate_path(path: &str) -> Result<(), Error> {
    if !path.starts_with('/') {
        return Err(Error::with(format!("prim path '{}' must be absolute", path)));
    }
    if path.len() == 1 || path.ends_with('/') {
        return Err(Error::with(format!(
            "prim path '{}' must name a prim below the root",
            path
        )));
    }
    for segment in path[1..].split('/') {
        let mut characters = segment.chars();
        let valid = match characters.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && characters.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if !valid {
            return Err(Error::with(format!(
                "invalid prim path segment '{}' in '{}'",
                segment, path
            )));
        }
    }
    Ok(())
}

/// Module used to enforce the existence of only a single interactive app.
mod window_marker {
    use std::sync::atomic::{AtomicBool, Ordering};

    /// A marker for whether or not an interactive app has been started.
    ///
    /// The application can only serve one viewport per process, whether
    /// windowed or streamed, so the limit is enforced here before anything
    /// reaches the engine.
    static WINDOW_EXISTS: AtomicBool = AtomicBool::new(false);

    /// A marker type for keeping track of the existence of an interactive app.
    pub struct WindowMarker {
        _unused: (),
    }

    impl WindowMarker {
        /// Attempts to acquire the window marker.
        pub fn acquire() -> Result<WindowMarker, crate::Error> {
            // We can probably use a weaker ordering but this will be called so little that we
            // may as well be sure about it.
            match WINDOW_EXISTS.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(false) => Ok(WindowMarker { _unused: () }),
                _ => Err(crate::Error::new(
                    "Only one interactive simulator app allowed per process",
                )),
            }
        }
    }

    impl Drop for WindowMarker {
        fn drop(&mut self) {
            // We are the only marker so no need to CAS
            WINDOW_EXISTS.store(false, Ordering::SeqCst)
        }
    }
}
