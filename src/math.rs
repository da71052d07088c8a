//! Rotation helpers for the degree-based Euler angles the scene scripts use.
//!
//! The simulator expects orientations as unit quaternions with the scalar
//! component stored first, while nalgebra keeps its quaternion coordinates in
//! (x, y, z, w) order. The helpers here convert between the two and clip
//! floating-point noise so orientations compare and display cleanly.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::Error;

/// Decimal digits kept in converted quaternion components.
const QUAT_DECIMALS: i32 = 10;

/// Converts Euler angles (roll, pitch, yaw) in degrees to a quaternion.
///
/// The rotation is composed from the elementary rotations about the fixed x,
/// y and z axes applied in that order (roll first, then pitch, then yaw).
/// Angles outside [-360, 360] wrap to the equivalent rotation.
///
/// # Arguments
/// * `roll` - Rotation around the x-axis in degrees.
/// * `pitch` - Rotation around the y-axis in degrees.
/// * `yaw` - Rotation around the z-axis in degrees.
///
/// Returns the quaternion as `[w, x, y, z]` with each component rounded to
/// 10 decimal places. The result has unit norm for any finite input; a
/// non-finite angle propagates into the output, so validate upstream if that
/// matters to you.
pub fn quaternion_from_degrees(roll: f64, pitch: f64, yaw: f64) -> [f64; 4] {
    let rotation = UnitQuaternion::from_euler_angles(
        roll.to_radians(),
        pitch.to_radians(),
        yaw.to_radians(),
    );

    // nalgebra stores (x, y, z, w); the simulator wants the scalar first.
    let coords = &rotation.coords;
    [
        round_decimals(coords.w),
        round_decimals(coords.x),
        round_decimals(coords.y),
        round_decimals(coords.z),
    ]
}

/// Recovers (roll, pitch, yaw) in degrees from a `[w, x, y, z]` quaternion.
///
/// Inverse of [`quaternion_from_degrees`](`quaternion_from_degrees`). The
/// input is normalized first. Near gimbal lock (pitch = ±90°) the recovered
/// roll and yaw are coupled and may differ from the angles that produced the
/// quaternion, even though both describe the same rotation.
pub fn degrees_from_quaternion(quaternion: [f64; 4]) -> (f64, f64, f64) {
    let [w, x, y, z] = quaternion;
    let rotation =
        UnitQuaternion::from_quaternion(Quaternion::from_parts(w, Vector3::new(x, y, z)));
    let (roll, pitch, yaw) = rotation.euler_angles();
    (roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
}

/// Checks a `[w, x, y, z]` orientation before it crosses the engine boundary
/// and returns it as a normalized nalgebra quaternion.
pub(crate) fn unit_quaternion_from_wxyz(wxyz: [f64; 4]) -> Result<UnitQuaternion<f64>, Error> {
    let [w, x, y, z] = wxyz;
    if !(w.is_finite() && x.is_finite() && y.is_finite() && z.is_finite()) {
        return Err(Error::new("orientation components must be finite"));
    }

    let quaternion = Quaternion::from_parts(w, Vector3::new(x, y, z));
    if quaternion.norm() == 0.0 {
        return Err(Error::new("orientation must not be the zero quaternion"));
    }

    Ok(UnitQuaternion::from_quaternion(quaternion))
}

fn round_decimals(value: f64) -> f64 {
    let factor = 10_f64.powi(QUAT_DECIMALS);
    (value * factor).round() / factor
}
