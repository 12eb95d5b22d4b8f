//! Perifocal-to-inertial rotation (Vallado, Algorithm 10 "COE2RV").

use conic_core::vector::Vector3;

use crate::elements::KeplerianElements;

/// Inertial-frame unit vectors of the perifocal axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerifocalBasis {
    /// Toward periapsis (eccentricity direction).
    pub e_hat: Vector3,
    /// 90° ahead of periapsis in the direction of motion (semi-latus direction).
    pub p_hat: Vector3,
    /// Along the angular momentum.
    pub h_hat: Vector3,
}

impl PerifocalBasis {
    pub fn from_angles(raan_rad: f64, arg_periapsis_rad: f64, inclination_rad: f64) -> Self {
        let (so, co) = raan_rad.sin_cos();
        let (sw, cw) = arg_periapsis_rad.sin_cos();
        let (si, ci) = inclination_rad.sin_cos();

        Self {
            e_hat: [co * cw - so * sw * ci, so * cw + co * sw * ci, sw * si],
            p_hat: [-co * sw - so * cw * ci, -so * sw + co * cw * ci, cw * si],
            h_hat: [so * si, -co * si, ci],
        }
    }

    pub fn from_elements(elements: &KeplerianElements) -> Self {
        Self::from_angles(
            elements.raan_rad,
            elements.arg_periapsis_rad,
            elements.inclination_rad,
        )
    }

    /// Rotate perifocal components `(along E, along P)` into the inertial frame.
    #[inline]
    pub fn to_inertial(&self, e_component: f64, p_component: f64) -> Vector3 {
        [
            self.e_hat[0] * e_component + self.p_hat[0] * p_component,
            self.e_hat[1] * e_component + self.p_hat[1] * p_component,
            self.e_hat[2] * e_component + self.p_hat[2] * p_component,
        ]
    }
}
