//! Core units, constants, and shared primitives for the conic arc workspace.

pub mod error;
pub mod state;

pub use error::{BatchError, ConicError, DomainError, EntryError, InputError};
pub use state::{StateBatch, StateVector};

/// Physical and numerical constants.
pub mod constants {
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Full turn in radians.
    pub const TWO_PI: f64 = 2.0 * std::f64::consts::PI;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v.to_degrees()
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::SECONDS_PER_DAY;

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }
}

/// Angle helpers.
pub mod angle {
    use super::constants::TWO_PI;

    /// Wrap an angle into `[0, 2π)`.
    #[inline]
    pub fn wrap_two_pi(angle: f64) -> f64 {
        let wrapped = angle.rem_euclid(TWO_PI);
        // rem_euclid can round up to exactly 2π for tiny negative inputs
        if wrapped >= TWO_PI { 0.0 } else { wrapped }
    }

    /// Wrap an angle into `[-π, π)`.
    #[inline]
    pub fn wrap_pi(angle: f64) -> f64 {
        wrap_two_pi(angle + 0.5 * TWO_PI) - 0.5 * TWO_PI
    }

    /// Clamp a cosine-like ratio into `[-1, 1]` before `acos`/`asin`.
    #[inline]
    pub fn clamp_unit(value: f64) -> f64 {
        value.clamp(-1.0, 1.0)
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
///
/// The `*_each` functions are the batched forms: they map element `i` of
/// every input slice to element `i` of the output, so batch alignment is
/// kept by construction.
pub mod vector {
    use crate::error::{DomainError, InputError};

    /// Alias for a 3D vector in kilometres or km/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Right-handed cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector along `v`; zero-length input has no direction.
    pub fn unit(v: &Vector3) -> Result<Vector3, DomainError> {
        let n = norm(v);
        if n == 0.0 || !n.is_finite() {
            return Err(DomainError::ZeroVector);
        }
        Ok(scale(v, 1.0 / n))
    }

    /// `true` when every component is finite.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    /// Norm of every vector in a batch.
    pub fn norm_each(vs: &[Vector3]) -> Vec<f64> {
        vs.iter().map(norm).collect()
    }

    /// Pairwise dot products of two equally sized batches.
    pub fn dot_each(a: &[Vector3], b: &[Vector3]) -> Result<Vec<f64>, InputError> {
        check_len(a, b)?;
        Ok(a.iter().zip(b).map(|(x, y)| dot(x, y)).collect())
    }

    /// Pairwise cross products of two equally sized batches.
    pub fn cross_each(a: &[Vector3], b: &[Vector3]) -> Result<Vec<Vector3>, InputError> {
        check_len(a, b)?;
        Ok(a.iter().zip(b).map(|(x, y)| cross(x, y)).collect())
    }

    /// Unit vector of every entry; fails on the first zero-length vector.
    pub fn unit_each(vs: &[Vector3]) -> Result<Vec<Vector3>, DomainError> {
        vs.iter().map(unit).collect()
    }

    fn check_len(a: &[Vector3], b: &[Vector3]) -> Result<(), InputError> {
        if a.len() != b.len() {
            return Err(InputError::LengthMismatch {
                field: "vector batch",
                expected: a.len(),
                actual: b.len(),
            });
        }
        Ok(())
    }
}
