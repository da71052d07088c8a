//! Launch modes for the simulator application.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Ways to launch the simulator application.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub enum Mode {
    /// Runs the application without a viewport window.
    Headless,

    /// Opens the interactive viewport window. Only one windowed application
    /// is allowed per process.
    Windowed,

    /// Runs headless but serves the viewport to remote clients.
    Livestream {
        /// port on which the streaming server listens. `None` is for the default port `49100`
        port: Option<u16>,
    },
}

/// Compute device the physics engine runs on.
///
/// Parsed from the `--device` flag of the scene scripts: `"cpu"`, `"cuda"`
/// for the default GPU or `"cuda:N"` for a specific one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda {
        /// which GPU to use. `None` lets the engine pick.
        ordinal: Option<usize>,
    },
}

impl Default for Device {
    fn default() -> Device {
        Device::Cpu
    }
}

impl FromStr for Device {
    type Err = Error;

    fn from_str(s: &str) -> Result<Device, Error> {
        match s {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda { ordinal: None }),
            other => match other.strip_prefix("cuda:") {
                Some(ordinal) => {
                    let ordinal = ordinal.parse().map_err(|_| {
                        Error::with(format!("invalid GPU ordinal in device string '{}'", other))
                    })?;
                    Ok(Device::Cuda {
                        ordinal: Some(ordinal),
                    })
                }
                None => Err(Error::with(format!(
                    "unknown device '{}', expected 'cpu', 'cuda' or 'cuda:N'",
                    other
                ))),
            },
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda { ordinal: None } => write!(f, "cuda"),
            Device::Cuda {
                ordinal: Some(ordinal),
            } => write!(f, "cuda:{}", ordinal),
        }
    }
}
