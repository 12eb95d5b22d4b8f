//! Error taxonomy shared by every numerical crate.
//!
//! `DomainError` covers degenerate geometry detected while evaluating a
//! formula; `InputError` covers caller-supplied parameters that are invalid
//! before any geometry is computed. Neither is ever recovered internally.

use thiserror::Error;

/// Degenerate geometry or a math function evaluated outside its domain.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    #[error("position vector has zero magnitude")]
    ZeroPosition,
    #[error("angular momentum is zero (position and velocity are collinear)")]
    ZeroAngularMomentum,
    #[error("energy and angular momentum give an imaginary eccentricity (radicand {radicand})")]
    InvalidEccentricity { radicand: f64 },
    #[error("{function} argument {value} lies outside its domain")]
    OutOfDomain { function: &'static str, value: f64 },
    #[error("transfer angle of {delta_nu_rad} rad is singular for the chord time-of-flight form")]
    SingularTransferAngle { delta_nu_rad: f64 },
    #[error("vector has zero magnitude and no direction")]
    ZeroVector,
    #[error("true anomaly {true_anomaly_rad} rad lies beyond the asymptote of an open orbit")]
    BeyondAsymptote { true_anomaly_rad: f64 },
}

/// Invalid caller-supplied parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InputError {
    #[error("sample count must be at least 2, got {0}")]
    TooFewSamples(usize),
    #[error("gravitational parameter must be positive and finite, got {0}")]
    NonPositiveMu(f64),
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{field} contains a non-finite value")]
    NonFinite { field: &'static str },
}

/// Either class of failure, as returned by the numerical entry points.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConicError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("input error: {0}")]
    Input(#[from] InputError),
}

impl ConicError {
    /// `true` for degenerate-geometry failures.
    pub fn is_domain(&self) -> bool {
        matches!(self, ConicError::Domain(_))
    }

    /// `true` for invalid-parameter failures.
    pub fn is_input(&self) -> bool {
        matches!(self, ConicError::Input(_))
    }
}

/// Validate a gravitational parameter.
pub fn check_mu(mu_km3_s2: f64) -> Result<f64, InputError> {
    if mu_km3_s2.is_finite() && mu_km3_s2 > 0.0 {
        Ok(mu_km3_s2)
    } else {
        Err(InputError::NonPositiveMu(mu_km3_s2))
    }
}

/// Validate a strictly positive, finite parameter.
pub fn check_positive(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(InputError::NonPositive { field, value })
    }
}

/// A failure attributed to one entry of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("batch entry {index}: {source}")]
pub struct EntryError {
    pub index: usize,
    #[source]
    pub source: ConicError,
}

impl EntryError {
    pub fn new(index: usize, source: impl Into<ConicError>) -> Self {
        Self {
            index,
            source: source.into(),
        }
    }
}

/// Failure of a batch operation: the batch is malformed as a whole, or one
/// of its entries failed.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BatchError {
    #[error("malformed batch: {0}")]
    Shape(#[from] InputError),
    #[error(transparent)]
    Entry(#[from] EntryError),
}

/// Resolve per-entry results in index order, reporting the lowest failing index.
pub fn first_failure<T>(results: Vec<Result<T, EntryError>>) -> Result<Vec<T>, EntryError> {
    results.into_iter().collect()
}
