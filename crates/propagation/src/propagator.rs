//! Single-point conic propagator.
//!
//! From one state the orbit is fixed completely, so the arc is sampled in
//! closed form: evenly spaced true anomalies from the epoch anomaly to a
//! target anomaly, each mapped through the conic equation and rotated out
//! of the perifocal frame. The target is a setting rather than a second
//! known state; this is the simplified mode of a two-boundary-point solve.

use conic_core::angle::wrap_two_pi;
use conic_core::constants::TWO_PI;
use conic_core::error::{EntryError, first_failure};
use conic_core::vector::Vector3;
use conic_core::{ConicError, DomainError, InputError, StateBatch, StateVector};
use conic_orbits::{
    ConicAnchor, ConicFamily, KeplerianElements, PerifocalBasis, extract, time_of_flight_anchored,
};
use log::debug;
use rayon::prelude::*;

use crate::arc::OrbitArc;

/// Default final true anomaly of an arc.
pub const DEFAULT_TARGET_TRUE_ANOMALY_DEG: f64 = 15.0;
/// Default number of samples per arc.
pub const DEFAULT_SAMPLE_COUNT: usize = 15;

/// Where the arc ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetAnomaly {
    /// A fixed true anomaly, whatever the epoch anomaly is.
    Absolute { true_anomaly_rad: f64 },
    /// A fixed sweep past the epoch anomaly.
    Offset { delta_rad: f64 },
}

impl Default for TargetAnomaly {
    fn default() -> Self {
        TargetAnomaly::Absolute {
            true_anomaly_rad: DEFAULT_TARGET_TRUE_ANOMALY_DEG.to_radians(),
        }
    }
}

impl TargetAnomaly {
    /// Forward sweep from `nu0` to the target, in `[0, 2π)`.
    pub fn sweep_from(&self, nu0: f64) -> f64 {
        let nu1 = match *self {
            TargetAnomaly::Absolute { true_anomaly_rad } => wrap_two_pi(true_anomaly_rad),
            TargetAnomaly::Offset { delta_rad } => wrap_two_pi(nu0 + delta_rad),
        };
        let mut sweep = nu1 - nu0;
        if sweep < 0.0 {
            sweep += TWO_PI;
        }
        sweep
    }

    fn angle(&self) -> f64 {
        match *self {
            TargetAnomaly::Absolute { true_anomaly_rad } => true_anomaly_rad,
            TargetAnomaly::Offset { delta_rad } => delta_rad,
        }
    }
}

/// Whole revolutions added to an elliptical arc before the target is reached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Revolutions {
    #[default]
    Single,
    Fixed(u32),
    /// As many complete periods as fit between the epoch and `epoch_s`.
    UntilEpoch { epoch_s: f64 },
}

/// Arc sampling settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationSettings {
    pub sample_count: usize,
    pub compute_time: bool,
    pub target: TargetAnomaly,
    pub revolutions: Revolutions,
}

impl Default for PropagationSettings {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            compute_time: false,
            target: TargetAnomaly::default(),
            revolutions: Revolutions::default(),
        }
    }
}

impl PropagationSettings {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.sample_count < 2 {
            return Err(InputError::TooFewSamples(self.sample_count));
        }
        if !self.target.angle().is_finite() {
            return Err(InputError::NonFinite {
                field: "target true anomaly",
            });
        }
        if let Revolutions::UntilEpoch { epoch_s } = self.revolutions {
            if !epoch_s.is_finite() {
                return Err(InputError::NonFinite {
                    field: "revolution epoch",
                });
            }
        }
        Ok(())
    }
}

/// Batch-level propagation failure.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PropagationError {
    #[error("invalid propagation settings: {0}")]
    Settings(#[from] InputError),
    #[error(transparent)]
    Entry(#[from] EntryError),
}

/// Propagate every entry of a batch. Entries are independent and run in
/// parallel; the output keeps the batch order.
pub fn propagate(
    batch: &StateBatch,
    settings: &PropagationSettings,
) -> Result<Vec<OrbitArc>, PropagationError> {
    settings.validate()?;
    let states: Vec<StateVector> = batch.iter().collect();
    let results: Vec<Result<OrbitArc, EntryError>> = states
        .par_iter()
        .enumerate()
        .map(|(i, state)| propagate_state(state, settings).map_err(|e| EntryError::new(i, e)))
        .collect();
    Ok(first_failure(results)?)
}

/// Propagate one state.
pub fn propagate_state(
    state: &StateVector,
    settings: &PropagationSettings,
) -> Result<OrbitArc, ConicError> {
    settings.validate()?;
    state.validate()?;
    let mu = state.mu_km3_s2;
    let elements = extract(&state.position_km, &state.velocity_km_s, mu)?;
    let nu0 = elements.true_anomaly_rad;

    let family = elements.family();
    let revs = revolution_count(&settings.revolutions, &elements, state);
    let total_sweep = settings.target.sweep_from(nu0) + TWO_PI * revs as f64;
    debug!(
        "{family:?}: e = {:.6}, nu0 = {:.6} rad, sweep = {:.6} rad over {} samples",
        elements.eccentricity, nu0, total_sweep, settings.sample_count
    );

    let basis = PerifocalBasis::from_elements(&elements);
    let p = elements.semi_latus_rectum_km;
    let e = elements.eccentricity;
    let speed_scale = (mu / p).sqrt();
    let step = total_sweep / (settings.sample_count - 1) as f64;

    let n = settings.sample_count;
    let mut sweeps = Vec::with_capacity(n);
    let mut anomalies = Vec::with_capacity(n);
    let mut positions = Vec::with_capacity(n);
    let mut velocities = Vec::with_capacity(n);
    for k in 0..n {
        let sweep = k as f64 * step;
        let nu = nu0 + sweep;
        let (sin_nu, cos_nu) = nu.sin_cos();
        let denom = 1.0 + e * cos_nu;
        if denom <= 0.0 {
            return Err(DomainError::BeyondAsymptote {
                true_anomaly_rad: nu,
            }
            .into());
        }
        let radius = p / denom;
        positions.push(basis.to_inertial(radius * cos_nu, radius * sin_nu));
        velocities.push(basis.to_inertial(-speed_scale * sin_nu, speed_scale * (e + cos_nu)));
        sweeps.push(sweep);
        anomalies.push(nu);
    }

    let times = if settings.compute_time {
        Some(sample_times(state, &elements, &positions, &sweeps)?)
    } else {
        None
    };

    Ok(OrbitArc::new(positions, velocities, anomalies, times))
}

/// Epoch of every sample: the epoch itself, then the closed-form flight
/// time from sample 0 plus any whole periods swept.
fn sample_times(
    state: &StateVector,
    elements: &KeplerianElements,
    positions: &[Vector3],
    sweeps: &[f64],
) -> Result<Vec<f64>, ConicError> {
    let mu = state.mu_km3_s2;
    let tof = time_of_flight_anchored(
        &positions[0],
        &positions[1..],
        elements.semi_latus_rectum_km,
        &sweeps[1..],
        mu,
        &ConicAnchor::from(elements),
    )?;
    let period = elements.period_s(mu).unwrap_or(0.0);

    let mut times = Vec::with_capacity(positions.len());
    times.push(state.epoch_s);
    for (dt, sweep) in tof.iter().zip(&sweeps[1..]) {
        let rev_count = (sweep / TWO_PI).floor();
        times.push(state.epoch_s + dt + rev_count * period);
    }
    Ok(times)
}

fn revolution_count(
    revolutions: &Revolutions,
    elements: &KeplerianElements,
    state: &StateVector,
) -> u32 {
    if matches!(revolutions, Revolutions::Single) {
        return 0;
    }
    if elements.family() != ConicFamily::Ellipse {
        debug!("revolution counting skipped for {:?} orbit", elements.family());
        return 0;
    }
    match *revolutions {
        Revolutions::Single => 0,
        Revolutions::Fixed(count) => count,
        Revolutions::UntilEpoch { epoch_s } => {
            let Some(period) = elements.period_s(state.mu_km3_s2) else {
                return 0;
            };
            let span = epoch_s - state.epoch_s;
            if span <= 0.0 {
                0
            } else {
                (span / period).floor().min(u32::MAX as f64) as u32
            }
        }
    }
}
