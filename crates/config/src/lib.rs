//! Configuration models and loaders for the conic arc workspace.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Central body entry from a catalog.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub mu_km3_s2: f64,
    pub radius_km: f64,
    /// Sidereal rotation period; bodies without one are treated as non-rotating.
    #[serde(default)]
    pub rotation_period_days: Option<f64>,
}

impl BodyConfig {
    /// Altitude above the reference sphere for a body-centred radius.
    pub fn altitude_km(&self, radius_km: f64) -> f64 {
        radius_km - self.radius_km
    }
}

/// How the arc's final true anomaly is chosen. Angles are in degrees.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "mode")]
pub enum TargetConfig {
    #[serde(rename = "absolute")]
    Absolute { true_anomaly_deg: f64 },
    #[serde(rename = "offset")]
    Offset { delta_deg: f64 },
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig::Absolute {
            true_anomaly_deg: 15.0,
        }
    }
}

/// Opt-in multi-revolution sweep.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(tag = "mode")]
pub enum RevolutionConfig {
    #[default]
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "fixed")]
    Fixed { count: u32 },
    #[serde(rename = "until_epoch")]
    UntilEpoch { epoch_s: f64 },
}

/// Arc sampling settings.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PropagationConfig {
    pub sample_count: usize,
    pub compute_time: bool,
    pub target: TargetConfig,
    pub revolutions: RevolutionConfig,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            sample_count: 15,
            compute_time: false,
            target: TargetConfig::default(),
            revolutions: RevolutionConfig::default(),
        }
    }
}

/// Errors that can occur while loading configuration files. File errors
/// carry the path that failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse YAML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to parse TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("body '{name}' is defined more than once (again in {})", path.display())]
    DuplicateBody { name: String, path: PathBuf },
    #[error("body '{0}' not found in catalog")]
    UnknownBody(String),
}

/// Load body entries from a YAML list, a single TOML file, or a directory of
/// TOML files (read in file-name order). Names must be unique regardless of
/// case, since lookups ignore case.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    let path = path.as_ref();
    let sourced: Vec<(PathBuf, BodyConfig)> = if path.is_dir() {
        catalog_files(path)?
            .into_iter()
            .map(|file| {
                let body = parse_toml(&file)?;
                Ok((file, body))
            })
            .collect::<Result<_, ConfigError>>()?
    } else if is_toml(path) {
        vec![(path.to_path_buf(), parse_toml(path)?)]
    } else {
        parse_yaml::<Vec<BodyConfig>>(path)?
            .into_iter()
            .map(|body| (path.to_path_buf(), body))
            .collect()
    };

    let mut seen = HashSet::new();
    for (file, body) in &sourced {
        if !seen.insert(body.name.to_uppercase()) {
            return Err(ConfigError::DuplicateBody {
                name: body.name.clone(),
                path: file.clone(),
            });
        }
    }
    Ok(sourced.into_iter().map(|(_, body)| body).collect())
}

/// Load propagation settings from a TOML or YAML file.
pub fn load_propagation<P: AsRef<Path>>(path: P) -> Result<PropagationConfig, ConfigError> {
    let path = path.as_ref();
    if is_toml(path) {
        parse_toml(path)
    } else {
        parse_yaml(path)
    }
}

/// Case-insensitive catalog lookup.
pub fn find_body<'a>(bodies: &'a [BodyConfig], name: &str) -> Result<&'a BodyConfig, ConfigError> {
    let upper = name.to_uppercase();
    bodies
        .iter()
        .find(|b| b.name.to_uppercase() == upper)
        .ok_or_else(|| ConfigError::UnknownBody(name.to_string()))
}

fn parse_toml<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_yaml<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let reader = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// TOML files directly inside `dir`, sorted by path.
fn catalog_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_toml(path))
        .collect();
    files.sort();
    Ok(files)
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}
