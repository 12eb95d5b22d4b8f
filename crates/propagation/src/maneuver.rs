//! Arcs flown after an impulsive maneuver.

use conic_core::vector::{self, Vector3};
use conic_core::{ConicError, StateVector};

use crate::arc::OrbitArc;
use crate::propagator::{PropagationSettings, propagate_state};

/// Pre-burn state and the impulsive velocity change applied at its epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManeuverState {
    pub position_km: Vector3,
    pub velocity_km_s: Vector3,
    pub delta_v_km_s: Vector3,
    pub epoch_s: f64,
    pub mu_km3_s2: f64,
}

impl ManeuverState {
    /// State immediately after the burn.
    pub fn post_burn_state(&self) -> StateVector {
        StateVector::new(
            self.position_km,
            vector::add(&self.velocity_km_s, &self.delta_v_km_s),
            self.epoch_s,
            self.mu_km3_s2,
        )
    }
}

/// Arc of the delivering spacecraft after a divert maneuver, cut off at
/// `final_time_s` (for instance the end of the relay window). Times are
/// always computed, whatever `settings.compute_time` says.
pub fn carrier_arc(
    maneuver: &ManeuverState,
    settings: &PropagationSettings,
    final_time_s: f64,
) -> Result<OrbitArc, ConicError> {
    let settings = PropagationSettings {
        compute_time: true,
        ..*settings
    };
    let arc = propagate_state(&maneuver.post_burn_state(), &settings)?;
    Ok(arc.truncate_before(final_time_s))
}
