//! Entry-site kinematics: planetary rotation and flight path angle.

use conic_core::angle::clamp_unit;
use conic_core::constants::TWO_PI;
use conic_core::error::check_positive;
use conic_core::time::days_to_seconds;
use conic_core::vector::{self, Vector3};
use conic_core::{ConicError, DomainError};

/// Spin vector of a body rotating about its +z axis.
pub fn spin_vector(rotation_period_days: f64) -> Result<Vector3, ConicError> {
    let period = check_positive("rotation period", rotation_period_days)?;
    Ok([0.0, 0.0, TWO_PI / days_to_seconds(period)])
}

/// Velocity of the co-rotating atmosphere at `position_km` (`ω × r`), km/s.
pub fn rotation_velocity(position_km: &Vector3, rotation_period_days: f64) -> Result<Vector3, ConicError> {
    let omega = spin_vector(rotation_period_days)?;
    Ok(vector::cross(&omega, position_km))
}

/// Inertial velocity minus the co-rotating atmosphere velocity.
pub fn atmosphere_relative_velocity(
    position_km: &Vector3,
    velocity_km_s: &Vector3,
    rotation_period_days: f64,
) -> Result<Vector3, ConicError> {
    let surface = rotation_velocity(position_km, rotation_period_days)?;
    Ok(vector::sub(velocity_km_s, &surface))
}

/// Angle of the velocity above the local horizontal, radians.
///
/// Negative while descending.
pub fn flight_path_angle(position_km: &Vector3, velocity_km_s: &Vector3) -> Result<f64, DomainError> {
    let r = vector::norm(position_km);
    let v = vector::norm(velocity_km_s);
    if r == 0.0 || v == 0.0 {
        return Err(DomainError::ZeroVector);
    }
    Ok(clamp_unit(vector::dot(position_km, velocity_km_s) / (r * v)).asin())
}
