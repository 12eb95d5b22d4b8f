//! Classical orbital elements from a Cartesian state.
//!
//! The extractor follows the angular-momentum route: `h = r × v` fixes the
//! orbit plane and the semi-latus rectum, the vis-viva energy fixes the
//! semi-major axis and eccentricity, and the true anomaly comes from the
//! conic equation with a quadrant fix on the sign of `r · v`.

use conic_core::angle::{clamp_unit, wrap_two_pi};
use conic_core::constants::TWO_PI;
use conic_core::error::{EntryError, check_mu, first_failure};
use conic_core::vector::{self, Vector3};
use conic_core::{ConicError, DomainError, StateBatch};
use log::{debug, warn};
use rayon::prelude::*;

/// Eccentricity below which periapsis is treated as undefined.
pub const CIRCULAR_ECCENTRICITY: f64 = 1.0e-11;
/// `sin i` below which the ascending node is treated as undefined.
pub const EQUATORIAL_SIN_INCLINATION: f64 = 1.0e-11;
/// Eccentricity band around 1 reported as parabolic.
pub const PARABOLIC_TOLERANCE: f64 = 1.0e-12;

// Rounding may push the eccentricity radicand of a circular state just below zero.
const RADICAND_SLACK: f64 = 1.0e-12;

/// Orbit family of a conic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConicFamily {
    Ellipse,
    Parabola,
    Hyperbola,
}

impl ConicFamily {
    /// Classify by eccentricity.
    pub fn from_eccentricity(e: f64) -> Self {
        if (e - 1.0).abs() <= PARABOLIC_TOLERANCE {
            ConicFamily::Parabola
        } else if e < 1.0 {
            ConicFamily::Ellipse
        } else {
            ConicFamily::Hyperbola
        }
    }
}

/// Keplerian elements of one trajectory at its epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerianElements {
    pub semi_latus_rectum_km: f64,
    pub eccentricity: f64,
    /// Signed: positive for ellipses, negative for hyperbolas, infinite for parabolas.
    pub semi_major_axis_km: f64,
    pub inclination_rad: f64,
    pub raan_rad: f64,
    pub arg_periapsis_rad: f64,
    /// True anomaly at epoch, in `[0, 2π)`.
    pub true_anomaly_rad: f64,
}

impl KeplerianElements {
    pub fn family(&self) -> ConicFamily {
        ConicFamily::from_eccentricity(self.eccentricity)
    }

    /// Orbital period for closed orbits.
    pub fn period_s(&self, mu_km3_s2: f64) -> Option<f64> {
        match self.family() {
            ConicFamily::Ellipse => Some(TWO_PI * (self.semi_major_axis_km.powi(3) / mu_km3_s2).sqrt()),
            _ => None,
        }
    }

    /// Hyperbolic excess speed for open orbits.
    pub fn v_infinity_km_s(&self, mu_km3_s2: f64) -> Option<f64> {
        match self.family() {
            ConicFamily::Hyperbola => Some((-mu_km3_s2 / self.semi_major_axis_km).sqrt()),
            ConicFamily::Parabola => Some(0.0),
            ConicFamily::Ellipse => None,
        }
    }

    /// Periapsis radius `p / (1 + e)`.
    pub fn periapsis_km(&self) -> f64 {
        self.semi_latus_rectum_km / (1.0 + self.eccentricity)
    }

    /// Radius on the conic at true anomaly `nu`.
    pub fn radius_at(&self, nu_rad: f64) -> f64 {
        self.semi_latus_rectum_km / (1.0 + self.eccentricity * nu_rad.cos())
    }
}

/// Extract elements from one position/velocity pair.
pub fn extract(
    position_km: &Vector3,
    velocity_km_s: &Vector3,
    mu_km3_s2: f64,
) -> Result<KeplerianElements, ConicError> {
    let mu = check_mu(mu_km3_s2)?;

    let r = vector::norm(position_km);
    if r == 0.0 {
        return Err(DomainError::ZeroPosition.into());
    }
    let h_vec = vector::cross(position_km, velocity_km_s);
    let h = vector::norm(&h_vec);
    if h == 0.0 {
        return Err(DomainError::ZeroAngularMomentum.into());
    }

    let h_hat = vector::scale(&h_vec, 1.0 / h);
    let r_hat = vector::scale(position_km, 1.0 / r);
    let th_hat = vector::cross(&h_hat, &r_hat);

    let p = h * h / mu;
    let v = vector::norm(velocity_km_s);
    let energy = 0.5 * v * v - mu / r;
    let sma = if energy == 0.0 {
        f64::INFINITY
    } else {
        -mu / (2.0 * energy)
    };

    let mut radicand = 1.0 + 2.0 * energy * h * h / (mu * mu);
    if radicand < 0.0 {
        if radicand < -RADICAND_SLACK {
            return Err(DomainError::InvalidEccentricity { radicand }.into());
        }
        radicand = 0.0;
    }
    let ecc = radicand.sqrt();

    let inclination = clamp_unit(h_hat[2]).acos();
    let sin_inc = h_hat[0].hypot(h_hat[1]);
    let (raan, arg_latitude) = if sin_inc < EQUATORIAL_SIN_INCLINATION {
        debug!("equatorial orbit: node undefined, measuring from +x");
        (0.0, (h_hat[2].signum() * r_hat[1]).atan2(r_hat[0]))
    } else {
        (h_hat[0].atan2(-h_hat[1]), r_hat[2].atan2(th_hat[2]))
    };

    let (true_anomaly, arg_periapsis) = if ecc < CIRCULAR_ECCENTRICITY {
        debug!("circular orbit (e = {ecc:e}): periapsis placed at the ascending node");
        (wrap_two_pi(arg_latitude), 0.0)
    } else {
        let nu = true_anomaly(p, ecc, r, position_km, velocity_km_s);
        (nu, arg_latitude - nu)
    };

    Ok(KeplerianElements {
        semi_latus_rectum_km: p,
        eccentricity: ecc,
        semi_major_axis_km: sma,
        inclination_rad: inclination,
        raan_rad: raan,
        arg_periapsis_rad: arg_periapsis,
        true_anomaly_rad: true_anomaly,
    })
}

/// True anomaly from the conic equation with the inbound-branch quadrant fix.
fn true_anomaly(p: f64, ecc: f64, r: f64, position_km: &Vector3, velocity_km_s: &Vector3) -> f64 {
    let cos_nu = (p / r - 1.0) / ecc;
    if cos_nu.abs() > 1.0 + 1.0e-9 {
        warn!("true-anomaly cosine {cos_nu} clamped into [-1, 1]");
    }
    let nu = clamp_unit(cos_nu).acos();
    if vector::dot(position_km, velocity_km_s) < 0.0 {
        wrap_two_pi(TWO_PI - nu)
    } else {
        nu
    }
}

/// Struct-of-arrays elements for a whole batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementsBatch {
    pub semi_latus_rectum_km: Vec<f64>,
    pub eccentricity: Vec<f64>,
    pub semi_major_axis_km: Vec<f64>,
    pub inclination_rad: Vec<f64>,
    pub raan_rad: Vec<f64>,
    pub arg_periapsis_rad: Vec<f64>,
    pub true_anomaly_rad: Vec<f64>,
}

impl ElementsBatch {
    pub fn len(&self) -> usize {
        self.eccentricity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eccentricity.is_empty()
    }

    /// Row `index` as a single element set.
    pub fn get(&self, index: usize) -> Option<KeplerianElements> {
        Some(KeplerianElements {
            semi_latus_rectum_km: *self.semi_latus_rectum_km.get(index)?,
            eccentricity: *self.eccentricity.get(index)?,
            semi_major_axis_km: *self.semi_major_axis_km.get(index)?,
            inclination_rad: *self.inclination_rad.get(index)?,
            raan_rad: *self.raan_rad.get(index)?,
            arg_periapsis_rad: *self.arg_periapsis_rad.get(index)?,
            true_anomaly_rad: *self.true_anomaly_rad.get(index)?,
        })
    }

    pub fn families(&self) -> Vec<ConicFamily> {
        self.eccentricity
            .iter()
            .map(|&e| ConicFamily::from_eccentricity(e))
            .collect()
    }

    fn push(&mut self, el: KeplerianElements) {
        self.semi_latus_rectum_km.push(el.semi_latus_rectum_km);
        self.eccentricity.push(el.eccentricity);
        self.semi_major_axis_km.push(el.semi_major_axis_km);
        self.inclination_rad.push(el.inclination_rad);
        self.raan_rad.push(el.raan_rad);
        self.arg_periapsis_rad.push(el.arg_periapsis_rad);
        self.true_anomaly_rad.push(el.true_anomaly_rad);
    }
}

impl FromIterator<KeplerianElements> for ElementsBatch {
    fn from_iter<I: IntoIterator<Item = KeplerianElements>>(iter: I) -> Self {
        let mut batch = ElementsBatch::default();
        for el in iter {
            batch.push(el);
        }
        batch
    }
}

/// Extract elements for every entry of a batch, in parallel.
pub fn extract_batch(batch: &StateBatch) -> Result<ElementsBatch, EntryError> {
    let positions = batch.positions_km();
    let velocities = batch.velocities_km_s();
    let mu = batch.mu_km3_s2();

    let results: Vec<Result<KeplerianElements, EntryError>> = (0..batch.len())
        .into_par_iter()
        .map(|i| extract(&positions[i], &velocities[i], mu[i]).map_err(|e| EntryError::new(i, e)))
        .collect();

    Ok(first_failure(results)?.into_iter().collect())
}
