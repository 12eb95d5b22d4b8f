//! CSV scenario files: initial states for propagation and body-relative
//! vectors for viewing angles.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use conic_core::vector::Vector3;
use conic_core::{InputError, StateBatch};
use serde::Deserialize;
use thiserror::Error;

/// One row of a state scenario. `mu_km3_s2` may be omitted when a default
/// body is supplied by the caller.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct StateRow {
    pub x_km: f64,
    pub y_km: f64,
    pub z_km: f64,
    pub vx_km_s: f64,
    pub vy_km_s: f64,
    pub vz_km_s: f64,
    pub epoch_s: f64,
    #[serde(default)]
    pub mu_km3_s2: Option<f64>,
}

/// One row of a viewing-geometry scenario; all vectors are body-relative.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RelativeRow {
    pub sun_x_km: f64,
    pub sun_y_km: f64,
    pub sun_z_km: f64,
    pub earth_x_km: f64,
    pub earth_y_km: f64,
    pub earth_z_km: f64,
    pub x_km: f64,
    pub y_km: f64,
    pub z_km: f64,
    pub vx_km_s: f64,
    pub vy_km_s: f64,
    pub vz_km_s: f64,
}

/// Column-wise view of a viewing-geometry scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelativeColumns {
    pub body_to_sun: Vec<Vector3>,
    pub body_to_earth: Vec<Vector3>,
    pub positions_km: Vec<Vector3>,
    pub velocities_km_s: Vec<Vector3>,
}

impl RelativeColumns {
    pub fn len(&self) -> usize {
        self.positions_km.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions_km.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row} has no mu_km3_s2 and no default body was given")]
    MissingMu { row: usize },
    #[error("scenario has no rows")]
    Empty,
    #[error("invalid scenario: {0}")]
    Input(#[from] InputError),
}

/// Load a state scenario from a CSV file.
pub fn load_states<P: AsRef<Path>>(
    path: P,
    default_mu_km3_s2: Option<f64>,
) -> Result<StateBatch, ScenarioError> {
    let file = File::open(path)?;
    read_states(file, default_mu_km3_s2)
}

/// Parse a state scenario from any CSV source. A per-row `mu_km3_s2`
/// overrides the default.
pub fn read_states<R: Read>(
    reader: R,
    default_mu_km3_s2: Option<f64>,
) -> Result<StateBatch, ScenarioError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut positions = Vec::new();
    let mut velocities = Vec::new();
    let mut epochs = Vec::new();
    let mut mus = Vec::new();
    for (row, record) in reader.deserialize::<StateRow>().enumerate() {
        let record = record?;
        let mu = record
            .mu_km3_s2
            .or(default_mu_km3_s2)
            .ok_or(ScenarioError::MissingMu { row })?;
        positions.push([record.x_km, record.y_km, record.z_km]);
        velocities.push([record.vx_km_s, record.vy_km_s, record.vz_km_s]);
        epochs.push(record.epoch_s);
        mus.push(mu);
    }
    if positions.is_empty() {
        return Err(ScenarioError::Empty);
    }
    Ok(StateBatch::new(positions, velocities, epochs, mus)?)
}

/// Load a viewing-geometry scenario from a CSV file.
pub fn load_relative<P: AsRef<Path>>(path: P) -> Result<RelativeColumns, ScenarioError> {
    let file = File::open(path)?;
    read_relative(file)
}

/// Parse a viewing-geometry scenario from any CSV source.
pub fn read_relative<R: Read>(reader: R) -> Result<RelativeColumns, ScenarioError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = RelativeColumns::default();
    for record in reader.deserialize::<RelativeRow>() {
        let record = record?;
        out.body_to_sun
            .push([record.sun_x_km, record.sun_y_km, record.sun_z_km]);
        out.body_to_earth
            .push([record.earth_x_km, record.earth_y_km, record.earth_z_km]);
        out.positions_km.push([record.x_km, record.y_km, record.z_km]);
        out.velocities_km_s
            .push([record.vx_km_s, record.vy_km_s, record.vz_km_s]);
    }
    if out.is_empty() {
        return Err(ScenarioError::Empty);
    }
    Ok(out)
}
