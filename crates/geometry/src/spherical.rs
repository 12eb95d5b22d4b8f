//! Cartesian to spherical conversion (radius, elevation, azimuth).
//!
//! The output stays in the frame of the input: no body rotation is removed,
//! so for inertial input the azimuth is a right ascension rather than a
//! body-fixed longitude.

use conic_core::units::rad_to_deg;
use conic_core::vector::Vector3;

/// Spherical coordinates of one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoord {
    /// Same length unit as the input.
    pub radius: f64,
    /// +90 at the +z pole, -90 at the -z pole.
    pub elevation_deg: f64,
    /// 0 along +x, increasing toward +y.
    pub azimuth_deg: f64,
}

/// Struct-of-arrays spherical coordinates. The columns are only filled by
/// [`to_spherical_batch`], so they always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphericalBatch {
    radius: Vec<f64>,
    elevation_deg: Vec<f64>,
    azimuth_deg: Vec<f64>,
}

impl SphericalBatch {
    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }

    pub fn radius(&self) -> &[f64] {
        &self.radius
    }

    pub fn elevation_deg(&self) -> &[f64] {
        &self.elevation_deg
    }

    pub fn azimuth_deg(&self) -> &[f64] {
        &self.azimuth_deg
    }

    pub fn get(&self, index: usize) -> Option<SphericalCoord> {
        Some(SphericalCoord {
            radius: *self.radius.get(index)?,
            elevation_deg: *self.elevation_deg.get(index)?,
            azimuth_deg: *self.azimuth_deg.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SphericalCoord> + '_ {
        self.radius
            .iter()
            .zip(&self.elevation_deg)
            .zip(&self.azimuth_deg)
            .map(|((&radius, &elevation_deg), &azimuth_deg)| SphericalCoord {
                radius,
                elevation_deg,
                azimuth_deg,
            })
    }
}

/// Convert one Cartesian point.
pub fn to_spherical(point: &Vector3) -> SphericalCoord {
    let [x, y, z] = *point;
    let horizontal = x.hypot(y);
    SphericalCoord {
        radius: (x * x + y * y + z * z).sqrt(),
        elevation_deg: rad_to_deg(z.atan2(horizontal)),
        azimuth_deg: rad_to_deg(y.atan2(x)),
    }
}

/// Convert every point of a batch, keeping index order.
pub fn to_spherical_batch(points: &[Vector3]) -> SphericalBatch {
    let mut out = SphericalBatch {
        radius: Vec::with_capacity(points.len()),
        elevation_deg: Vec::with_capacity(points.len()),
        azimuth_deg: Vec::with_capacity(points.len()),
    };
    for point in points {
        let s = to_spherical(point);
        out.radius.push(s.radius);
        out.elevation_deg.push(s.elevation_deg);
        out.azimuth_deg.push(s.azimuth_deg);
    }
    out
}
