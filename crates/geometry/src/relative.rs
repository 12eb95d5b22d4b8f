//! Sun and Earth relative viewing angles at a target body.

use conic_core::angle::clamp_unit;
use conic_core::error::{BatchError, EntryError, first_failure};
use conic_core::vector::{self, Vector3};
use conic_core::{DomainError, InputError};

/// Phase, conjunction, and incidence angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeAngles {
    /// Between the body-to-Sun line and the spacecraft velocity.
    pub phase_rad: f64,
    /// Between the body-to-Sun and body-to-Earth lines.
    pub conjunction_rad: f64,
    /// Between the body-to-Sun line and the spacecraft position.
    pub incidence_rad: f64,
}

/// Struct-of-arrays angles for a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelativeAnglesBatch {
    pub phase_rad: Vec<f64>,
    pub conjunction_rad: Vec<f64>,
    pub incidence_rad: Vec<f64>,
}

impl RelativeAnglesBatch {
    pub fn len(&self) -> usize {
        self.phase_rad.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phase_rad.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RelativeAngles> {
        Some(RelativeAngles {
            phase_rad: *self.phase_rad.get(index)?,
            conjunction_rad: *self.conjunction_rad.get(index)?,
            incidence_rad: *self.incidence_rad.get(index)?,
        })
    }
}

/// Angle between two vectors via the clamped normalized dot product.
pub fn angle_between(a: &Vector3, b: &Vector3) -> Result<f64, DomainError> {
    let na = vector::norm(a);
    let nb = vector::norm(b);
    if na == 0.0 || nb == 0.0 {
        return Err(DomainError::ZeroVector);
    }
    Ok(clamp_unit(vector::dot(a, b) / (na * nb)).acos())
}

/// Angles for one spacecraft state; every vector is relative to the body.
pub fn relative_angles(
    body_to_sun: &Vector3,
    body_to_earth: &Vector3,
    position: &Vector3,
    velocity: &Vector3,
) -> Result<RelativeAngles, DomainError> {
    Ok(RelativeAngles {
        phase_rad: angle_between(body_to_sun, velocity)?,
        conjunction_rad: angle_between(body_to_sun, body_to_earth)?,
        incidence_rad: angle_between(body_to_sun, position)?,
    })
}

/// Angles for parallel columns of body-relative vectors. Columns of
/// different lengths are a `Shape` error; a degenerate row is an `Entry`
/// error carrying its index.
pub fn relative_angles_batch(
    body_to_sun: &[Vector3],
    body_to_earth: &[Vector3],
    positions: &[Vector3],
    velocities: &[Vector3],
) -> Result<RelativeAnglesBatch, BatchError> {
    let n = body_to_sun.len();
    for (field, len) in [
        ("body-to-earth vectors", body_to_earth.len()),
        ("positions", positions.len()),
        ("velocities", velocities.len()),
    ] {
        if len != n {
            return Err(InputError::LengthMismatch {
                field,
                expected: n,
                actual: len,
            }
            .into());
        }
    }

    let rows = first_failure(
        (0..n)
            .map(|i| {
                relative_angles(&body_to_sun[i], &body_to_earth[i], &positions[i], &velocities[i])
                    .map_err(|e| EntryError::new(i, e))
            })
            .collect(),
    )?;

    let mut out = RelativeAnglesBatch::default();
    for row in rows {
        out.phase_rad.push(row.phase_rad);
        out.conjunction_rad.push(row.conjunction_rad);
        out.incidence_rad.push(row.incidence_rad);
    }
    Ok(out)
}
