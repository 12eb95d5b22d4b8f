//! Sampled arcs produced by the propagator.

use conic_core::vector::{self, Vector3};
use conic_geometry::{SphericalBatch, to_spherical_batch};

/// One sample of an arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSample {
    pub position_km: Vector3,
    pub velocity_km_s: Vector3,
    pub true_anomaly_rad: f64,
    /// Present only when times were requested.
    pub time_s: Option<f64>,
}

/// Positions, velocities, and optional times at evenly spaced true anomalies.
///
/// Sample 0 is the propagated state itself; when times are present,
/// `times_s[0]` is the input epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitArc {
    positions_km: Vec<Vector3>,
    velocities_km_s: Vec<Vector3>,
    true_anomaly_rad: Vec<f64>,
    times_s: Option<Vec<f64>>,
}

impl OrbitArc {
    pub(crate) fn new(
        positions_km: Vec<Vector3>,
        velocities_km_s: Vec<Vector3>,
        true_anomaly_rad: Vec<f64>,
        times_s: Option<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(positions_km.len(), velocities_km_s.len());
        debug_assert_eq!(positions_km.len(), true_anomaly_rad.len());
        Self {
            positions_km,
            velocities_km_s,
            true_anomaly_rad,
            times_s,
        }
    }

    pub fn len(&self) -> usize {
        self.positions_km.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions_km.is_empty()
    }

    pub fn positions_km(&self) -> &[Vector3] {
        &self.positions_km
    }

    pub fn velocities_km_s(&self) -> &[Vector3] {
        &self.velocities_km_s
    }

    /// Unwrapped true anomalies; they increase monotonically from the epoch value.
    pub fn true_anomaly_rad(&self) -> &[f64] {
        &self.true_anomaly_rad
    }

    pub fn times_s(&self) -> Option<&[f64]> {
        self.times_s.as_deref()
    }

    pub fn sample(&self, index: usize) -> Option<ArcSample> {
        Some(ArcSample {
            position_km: *self.positions_km.get(index)?,
            velocity_km_s: *self.velocities_km_s.get(index)?,
            true_anomaly_rad: *self.true_anomaly_rad.get(index)?,
            time_s: match &self.times_s {
                Some(times) => Some(*times.get(index)?),
                None => None,
            },
        })
    }

    pub fn first(&self) -> Option<ArcSample> {
        self.sample(0)
    }

    pub fn last(&self) -> Option<ArcSample> {
        self.sample(self.len().checked_sub(1)?)
    }

    /// Distance from the central body of every sample.
    pub fn radii_km(&self) -> Vec<f64> {
        vector::norm_each(&self.positions_km)
    }

    /// Consume the arc as an ordered sample sequence.
    pub fn into_samples(self) -> impl ExactSizeIterator<Item = ArcSample> {
        let times = self.times_s;
        self.positions_km
            .into_iter()
            .zip(self.velocities_km_s)
            .zip(self.true_anomaly_rad)
            .enumerate()
            .map(move |(i, ((position_km, velocity_km_s), true_anomaly_rad))| ArcSample {
                position_km,
                velocity_km_s,
                true_anomaly_rad,
                time_s: times.as_ref().map(|t| t[i]),
            })
    }

    /// Keep the samples strictly before the first one whose time reaches
    /// `final_time_s`. Arcs without times, or that never reach it, are kept whole.
    pub fn truncate_before(mut self, final_time_s: f64) -> Self {
        let Some(times) = self.times_s.as_mut() else {
            return self;
        };
        if let Some(cut) = times.iter().position(|&t| t >= final_time_s) {
            times.truncate(cut);
            self.positions_km.truncate(cut);
            self.velocities_km_s.truncate(cut);
            self.true_anomaly_rad.truncate(cut);
        }
        self
    }

    /// Radius, elevation, and azimuth of every sample, in the arc's own frame.
    pub fn to_spherical(&self) -> SphericalBatch {
        to_spherical_batch(&self.positions_km)
    }
}
