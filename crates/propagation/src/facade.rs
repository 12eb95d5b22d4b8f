//! Re-exported APIs for consumers of the propagation crate.

pub use crate::arc::{ArcSample, OrbitArc};
pub use crate::maneuver::{ManeuverState, carrier_arc};
pub use crate::propagator::{
    PropagationError, PropagationSettings, Revolutions, TargetAnomaly, propagate, propagate_state,
};

use conic_config::{PropagationConfig, RevolutionConfig, TargetConfig};
use conic_core::InputError;

/// Convert a `PropagationConfig` into runtime settings, validating it.
pub fn settings_from_config(config: &PropagationConfig) -> Result<PropagationSettings, InputError> {
    let target = match config.target {
        TargetConfig::Absolute { true_anomaly_deg } => TargetAnomaly::Absolute {
            true_anomaly_rad: true_anomaly_deg.to_radians(),
        },
        TargetConfig::Offset { delta_deg } => TargetAnomaly::Offset {
            delta_rad: delta_deg.to_radians(),
        },
    };
    let revolutions = match config.revolutions {
        RevolutionConfig::Single => Revolutions::Single,
        RevolutionConfig::Fixed { count } => Revolutions::Fixed(count),
        RevolutionConfig::UntilEpoch { epoch_s } => Revolutions::UntilEpoch { epoch_s },
    };

    let settings = PropagationSettings {
        sample_count: config.sample_count,
        compute_time: config.compute_time,
        target,
        revolutions,
    };
    settings.validate()?;
    Ok(settings)
}
