//! Caller-supplied state vectors, single and batched.

use crate::error::{InputError, check_mu};
use crate::vector::{self, Vector3};

/// Position, velocity, epoch, and central-body GM of one trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position_km: Vector3,
    pub velocity_km_s: Vector3,
    /// Seconds past the reference epoch.
    pub epoch_s: f64,
    pub mu_km3_s2: f64,
}

impl StateVector {
    pub fn new(position_km: Vector3, velocity_km_s: Vector3, epoch_s: f64, mu_km3_s2: f64) -> Self {
        Self {
            position_km,
            velocity_km_s,
            epoch_s,
            mu_km3_s2,
        }
    }

    /// Check finiteness and the sign of μ.
    pub fn validate(&self) -> Result<(), InputError> {
        if !vector::is_finite(&self.position_km) {
            return Err(InputError::NonFinite { field: "position" });
        }
        if !vector::is_finite(&self.velocity_km_s) {
            return Err(InputError::NonFinite { field: "velocity" });
        }
        if !self.epoch_s.is_finite() {
            return Err(InputError::NonFinite { field: "epoch" });
        }
        check_mu(self.mu_km3_s2)?;
        Ok(())
    }
}

/// Struct-of-arrays batch of N independent trajectories.
///
/// Entry `i` of every column belongs to trajectory `i`; the columns are
/// private so they can only be built with equal lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateBatch {
    positions_km: Vec<Vector3>,
    velocities_km_s: Vec<Vector3>,
    epochs_s: Vec<f64>,
    mu_km3_s2: Vec<f64>,
}

impl StateBatch {
    /// Build a batch from parallel columns.
    pub fn new(
        positions_km: Vec<Vector3>,
        velocities_km_s: Vec<Vector3>,
        epochs_s: Vec<f64>,
        mu_km3_s2: Vec<f64>,
    ) -> Result<Self, InputError> {
        let n = positions_km.len();
        for (field, len) in [
            ("velocities", velocities_km_s.len()),
            ("epochs", epochs_s.len()),
            ("mu", mu_km3_s2.len()),
        ] {
            if len != n {
                return Err(InputError::LengthMismatch {
                    field,
                    expected: n,
                    actual: len,
                });
            }
        }
        let batch = Self {
            positions_km,
            velocities_km_s,
            epochs_s,
            mu_km3_s2,
        };
        for state in batch.iter() {
            state.validate()?;
        }
        Ok(batch)
    }

    /// Build a batch sharing one central body.
    pub fn with_common_mu(
        positions_km: Vec<Vector3>,
        velocities_km_s: Vec<Vector3>,
        epochs_s: Vec<f64>,
        mu_km3_s2: f64,
    ) -> Result<Self, InputError> {
        let mu = vec![mu_km3_s2; positions_km.len()];
        Self::new(positions_km, velocities_km_s, epochs_s, mu)
    }

    /// Gather row-wise states into columns.
    pub fn from_states(states: &[StateVector]) -> Result<Self, InputError> {
        Self::new(
            states.iter().map(|s| s.position_km).collect(),
            states.iter().map(|s| s.velocity_km_s).collect(),
            states.iter().map(|s| s.epoch_s).collect(),
            states.iter().map(|s| s.mu_km3_s2).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.positions_km.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions_km.is_empty()
    }

    /// Row `index` of the batch.
    pub fn get(&self, index: usize) -> Option<StateVector> {
        Some(StateVector {
            position_km: *self.positions_km.get(index)?,
            velocity_km_s: *self.velocities_km_s.get(index)?,
            epoch_s: *self.epochs_s.get(index)?,
            mu_km3_s2: *self.mu_km3_s2.get(index)?,
        })
    }

    /// Rows in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = StateVector> + '_ {
        (0..self.len()).map(|i| StateVector {
            position_km: self.positions_km[i],
            velocity_km_s: self.velocities_km_s[i],
            epoch_s: self.epochs_s[i],
            mu_km3_s2: self.mu_km3_s2[i],
        })
    }

    pub fn positions_km(&self) -> &[Vector3] {
        &self.positions_km
    }

    pub fn velocities_km_s(&self) -> &[Vector3] {
        &self.velocities_km_s
    }

    pub fn epochs_s(&self) -> &[f64] {
        &self.epochs_s
    }

    pub fn mu_km3_s2(&self) -> &[f64] {
        &self.mu_km3_s2
    }
}
