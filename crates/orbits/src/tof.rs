//! Closed-form time of flight between two points on one conic
//! (Vallado, Algorithm 11 "FINDTOF").
//!
//! Each pair `(r0, r[k])` is reduced to chord coefficients `k, l, m`, the
//! implied semi-major axis, and the Lagrange `f`, `g` coefficients. Pairs
//! are then partitioned by conic family and every partition is solved with
//! its own formula; results are written back at their original index.
//!
//! The chord form degrades as the sweep approaches half a revolution, and
//! again as it approaches a whole one. Pairs inside either band need a
//! [`ConicAnchor`] and are timed from their anomalies with Kepler's equation
//! instead.

use conic_core::angle::{wrap_pi, wrap_two_pi};
use conic_core::constants::TWO_PI;
use conic_core::error::{check_mu, check_positive};
use conic_core::vector::{self, Vector3};
use conic_core::{ConicError, DomainError, InputError};
use log::{debug, warn};

use crate::elements::{ConicFamily, KeplerianElements};

// |α·r0| below this is parabolic (α = 1/a is dimensionless once scaled by r0).
const PARABOLIC_ALPHA: f64 = 1.0e-10;
/// `|cos(Δν/2)|` or `|sin(Δν/2)|` below this is too close to a half or a
/// whole turn for the chord form.
pub const DEGENERATE_CHORD_BAND: f64 = 1.0e-3;
// arccosh arguments this far below 1 are rounding, not geometry.
const ACOSH_SLACK: f64 = 1.0e-9;

/// Chord geometry of one `(r0, r)` pair.
#[derive(Debug, Clone, Copy)]
struct Chord {
    r0: f64,
    r: f64,
    delta_nu: f64,
    cos_dnu: f64,
    /// Reciprocal semi-major axis implied by the chord.
    alpha: f64,
    f: f64,
    g: f64,
}

impl Chord {
    fn new(r0: f64, r: f64, p: f64, delta_nu: f64, mu: f64) -> Self {
        let (sin_dnu, cos_dnu) = delta_nu.sin_cos();
        let k = r0 * r * (1.0 - cos_dnu);
        let l = r0 + r;
        let m = r0 * r * (1.0 + cos_dnu);

        let numerator = m * k * p;
        let denominator = (2.0 * m - l * l) * p * p + 2.0 * k * l * p - k * k;

        Self {
            r0,
            r,
            delta_nu,
            cos_dnu,
            alpha: denominator / numerator,
            f: 1.0 - r * (1.0 - cos_dnu) / p,
            g: r0 * r * sin_dnu / (mu * p).sqrt(),
        }
    }

    fn family(&self) -> ConicFamily {
        let scaled = self.alpha * self.r0;
        if scaled > PARABOLIC_ALPHA {
            ConicFamily::Ellipse
        } else if scaled < -PARABOLIC_ALPHA {
            ConicFamily::Hyperbola
        } else {
            ConicFamily::Parabola
        }
    }

    fn semi_major_axis(&self) -> f64 {
        1.0 / self.alpha
    }
}

/// Shape of the conic and the anomaly of `r0` on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicAnchor {
    pub eccentricity: f64,
    pub true_anomaly_rad: f64,
}

impl From<&KeplerianElements> for ConicAnchor {
    fn from(elements: &KeplerianElements) -> Self {
        Self {
            eccentricity: elements.eccentricity,
            true_anomaly_rad: elements.true_anomaly_rad,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pair {
    /// Zero sweep.
    Still,
    Chord(Chord),
    /// Chord is degenerate; carries the wrapped sweep.
    Anomalies(f64),
}

fn chord_degenerate(sweep: f64) -> bool {
    let (sin_half, cos_half) = (0.5 * sweep).sin_cos();
    cos_half.abs() < DEGENERATE_CHORD_BAND || sin_half.abs() < DEGENERATE_CHORD_BAND
}

/// Elapsed time from `r0` to each `r[k]` along the conic with semi-latus
/// rectum `p`, given the true-anomaly sweep `delta_nu[k]` of each pair.
///
/// Sweeps are taken modulo one revolution; whole revolutions are the
/// caller's to add. A sweep of zero (mod 2π) takes zero time. Other sweeps
/// within [`DEGENERATE_CHORD_BAND`] of a half or a whole revolution fail with
/// `SingularTransferAngle` since the chord does not fix the conic there; use
/// [`time_of_flight_anchored`] when the elements are known.
pub fn time_of_flight(
    r0: &Vector3,
    r: &[Vector3],
    p_km: f64,
    delta_nu_rad: &[f64],
    mu_km3_s2: f64,
) -> Result<Vec<f64>, ConicError> {
    solve(r0, r, p_km, delta_nu_rad, mu_km3_s2, None)
}

/// [`time_of_flight`] on a conic whose eccentricity and epoch anomaly are
/// known. Pairs where the chord degenerates are timed with Kepler's
/// equation.
pub fn time_of_flight_anchored(
    r0: &Vector3,
    r: &[Vector3],
    p_km: f64,
    delta_nu_rad: &[f64],
    mu_km3_s2: f64,
    anchor: &ConicAnchor,
) -> Result<Vec<f64>, ConicError> {
    solve(r0, r, p_km, delta_nu_rad, mu_km3_s2, Some(anchor))
}

fn solve(
    r0: &Vector3,
    r: &[Vector3],
    p_km: f64,
    delta_nu_rad: &[f64],
    mu_km3_s2: f64,
    anchor: Option<&ConicAnchor>,
) -> Result<Vec<f64>, ConicError> {
    let mu = check_mu(mu_km3_s2)?;
    let p = check_positive("semi-latus rectum", p_km)?;
    if r.len() != delta_nu_rad.len() {
        return Err(InputError::LengthMismatch {
            field: "true-anomaly differences",
            expected: r.len(),
            actual: delta_nu_rad.len(),
        }
        .into());
    }
    let r0_norm = vector::norm(r0);
    if r0_norm == 0.0 {
        return Err(DomainError::ZeroPosition.into());
    }

    let mut pairs = Vec::with_capacity(r.len());
    for (rk, &dnu) in r.iter().zip(delta_nu_rad) {
        if !dnu.is_finite() {
            return Err(InputError::NonFinite {
                field: "true-anomaly differences",
            }
            .into());
        }
        let rk_norm = vector::norm(rk);
        if rk_norm == 0.0 {
            return Err(DomainError::ZeroPosition.into());
        }
        let sweep = wrap_two_pi(dnu);
        let pair = if sweep == 0.0 {
            Pair::Still
        } else if chord_degenerate(sweep) {
            if anchor.is_none() {
                return Err(DomainError::SingularTransferAngle {
                    delta_nu_rad: sweep,
                }
                .into());
            }
            Pair::Anomalies(sweep)
        } else {
            Pair::Chord(Chord::new(r0_norm, rk_norm, p, sweep, mu))
        };
        pairs.push(pair);
    }

    let mut tof = vec![0.0; pairs.len()];
    for family in [
        ConicFamily::Ellipse,
        ConicFamily::Parabola,
        ConicFamily::Hyperbola,
    ] {
        let subset: Vec<(usize, Chord)> = pairs
            .iter()
            .enumerate()
            .filter_map(|(i, pair)| match pair {
                Pair::Chord(c) if c.family() == family => Some((i, *c)),
                _ => None,
            })
            .collect();
        if subset.is_empty() {
            continue;
        }
        debug!("time of flight: {} {family:?} pair(s)", subset.len());

        for (i, chord) in subset {
            tof[i] = match family {
                ConicFamily::Ellipse => elliptic(&chord, p, mu),
                ConicFamily::Parabola => parabolic(&chord, mu),
                ConicFamily::Hyperbola => hyperbolic(&chord, mu)?,
            };
        }
    }

    if let Some(anchor) = anchor {
        for (i, pair) in pairs.iter().enumerate() {
            if let Pair::Anomalies(sweep) = *pair {
                debug!("time of flight: pair {i} has a degenerate chord, using Kepler's equation");
                tof[i] = from_anomalies(anchor, p, sweep, mu)?;
            }
        }
    }

    Ok(tof)
}

fn elliptic(c: &Chord, p: f64, mu: f64) -> f64 {
    let half = 0.5 * c.delta_nu;
    let a = c.semi_major_axis();

    let f_dot = (mu / p).sqrt() * half.tan() * ((1.0 - c.cos_dnu) / p - 1.0 / c.r0 - 1.0 / c.r);
    let sin_de = -c.r0 * c.r * f_dot / (mu * a).sqrt();
    let cos_de = 1.0 - c.r0 * (1.0 - c.f) / a;
    let delta_e = wrap_two_pi(sin_de.atan2(cos_de));

    c.g + (a.powi(3) / mu).sqrt() * (delta_e - sin_de)
}

fn parabolic(c: &Chord, mu: f64) -> f64 {
    let chord = (c.r0 * c.r0 + c.r * c.r - 2.0 * c.r0 * c.r * c.cos_dnu).sqrt();
    let s = 0.5 * (c.r0 + c.r + chord);
    let ratio = ((s - chord) / s).max(0.0).powf(1.5);
    // Euler's relation takes the long branch past half a revolution.
    let branch = if c.delta_nu > 0.5 * TWO_PI { ratio } else { -ratio };
    2.0 / 3.0 * (s.powi(3) / (2.0 * mu)).sqrt() * (1.0 + branch)
}

fn hyperbolic(c: &Chord, mu: f64) -> Result<f64, ConicError> {
    let a = c.semi_major_axis();
    let mut arg = 1.0 + (c.f - 1.0) * c.r0 / a;
    if !arg.is_finite() || arg < 1.0 - ACOSH_SLACK {
        return Err(DomainError::OutOfDomain {
            function: "arccosh",
            value: arg,
        }
        .into());
    }
    if arg < 1.0 {
        warn!("arccosh argument {arg} clamped to 1");
        arg = 1.0;
    }
    let delta_h = arg.acosh();

    Ok(c.g + ((-a).powi(3) / mu).sqrt() * (delta_h.sinh() - delta_h))
}

/// Mean-anomaly difference over `sweep` starting at the anchor anomaly,
/// with `0 < sweep < 2π`.
fn from_anomalies(anchor: &ConicAnchor, p: f64, sweep: f64, mu: f64) -> Result<f64, ConicError> {
    let e = anchor.eccentricity;
    let nu0 = anchor.true_anomaly_rad;
    let nu1 = nu0 + sweep;

    match ConicFamily::from_eccentricity(e) {
        ConicFamily::Ellipse => {
            let a = p / (1.0 - e * e);
            // Unwrapped so that E stays within π of ν and the difference
            // runs continuously over (0, 2π).
            let eccentric = |nu: f64| {
                let (sin_half, cos_half) = (0.5 * nu).sin_cos();
                let big_e = 2.0 * ((1.0 - e).sqrt() * sin_half).atan2((1.0 + e).sqrt() * cos_half);
                big_e + TWO_PI * ((nu - big_e) / TWO_PI).round()
            };
            let (e0, e1) = (eccentric(nu0), eccentric(nu1));
            let delta_m = (e1 - e0) - e * (e1.sin() - e0.sin());
            Ok(delta_m.max(0.0) * (a.powi(3) / mu).sqrt())
        }
        ConicFamily::Parabola => {
            let barker = |nu: f64| {
                let d = (0.5 * wrap_pi(nu)).tan();
                d + d.powi(3) / 3.0
            };
            Ok((0.5 * (p.powi(3) / mu).sqrt() * (barker(nu1) - barker(nu0))).max(0.0))
        }
        ConicFamily::Hyperbola => {
            let a = p / (1.0 - e * e);
            let ratio = ((e - 1.0) / (e + 1.0)).sqrt();
            let mean = |nu: f64| -> Result<f64, ConicError> {
                let t = ratio * (0.5 * wrap_pi(nu)).tan();
                if t.abs() >= 1.0 {
                    return Err(DomainError::BeyondAsymptote {
                        true_anomaly_rad: nu,
                    }
                    .into());
                }
                let h = 2.0 * t.atanh();
                Ok(e * h.sinh() - h)
            };
            Ok(((mean(nu1)? - mean(nu0)?) * ((-a).powi(3) / mu).sqrt()).max(0.0))
        }
    }
}
