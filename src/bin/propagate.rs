use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use conic_arc::config::{PropagationConfig, TargetConfig, find_body, load_bodies, load_propagation};
use conic_arc::export::{ArcFormat, writer_for_path};
use conic_arc::propagation::{propagate, settings_from_config};
use conic_arc::scenario::load_states;
use log::info;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Propagate initial states along their conic arcs"
)]
struct Cli {
    /// Scenario CSV: x_km,y_km,z_km,vx_km_s,vy_km_s,vz_km_s,epoch_s[,mu_km3_s2]
    #[arg(long)]
    input: PathBuf,

    /// Central body used for rows without mu_km3_s2 (case-insensitive)
    #[arg(long)]
    body: Option<String>,

    /// Body catalog: YAML list, TOML file, or directory of TOML files
    #[arg(long, default_value = "configs/bodies")]
    bodies: PathBuf,

    /// Propagation settings file (TOML or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Samples per arc (overrides the settings file)
    #[arg(long)]
    samples: Option<usize>,

    /// Compute the epoch of every sample
    #[arg(long)]
    compute_time: bool,

    /// Final true anomaly in degrees (overrides the settings file)
    #[arg(long, conflicts_with = "offset_deg")]
    target_deg: Option<f64>,

    /// Sweep past the epoch anomaly in degrees (overrides the settings file)
    #[arg(long)]
    offset_deg: Option<f64>,

    /// Output format; inferred from the output extension, JSON otherwise
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Output path, `-` for stdout
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Format {
    Json,
    Csv,
}

impl From<Format> for ArcFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ArcFormat::Json,
            Format::Csv => ArcFormat::Csv,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_propagation(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => PropagationConfig::default(),
    };
    if let Some(samples) = cli.samples {
        config.sample_count = samples;
    }
    if cli.compute_time {
        config.compute_time = true;
    }
    if let Some(true_anomaly_deg) = cli.target_deg {
        config.target = TargetConfig::Absolute { true_anomaly_deg };
    }
    if let Some(delta_deg) = cli.offset_deg {
        config.target = TargetConfig::Offset { delta_deg };
    }
    let settings = settings_from_config(&config)?;

    let body = match &cli.body {
        Some(name) => {
            let bodies = load_bodies(&cli.bodies)
                .with_context(|| format!("loading bodies from {}", cli.bodies.display()))?;
            Some(find_body(&bodies, name)?.clone())
        }
        None => None,
    };

    let states = load_states(&cli.input, body.as_ref().map(|b| b.mu_km3_s2))
        .with_context(|| format!("loading states from {}", cli.input.display()))?;
    if states.is_empty() {
        bail!("no states in {}", cli.input.display());
    }
    info!("propagating {} state(s)", states.len());

    let arcs = propagate(&states, &settings)?;

    let format = cli
        .format
        .map(ArcFormat::from)
        .or_else(|| ArcFormat::from_path(&cli.output))
        .unwrap_or(ArcFormat::Json);
    let mut writer = writer_for_path(&cli.output)?;
    format.write(&mut *writer, body.as_ref().map(|b| b.name.as_str()), &arcs)?;
    writer.flush()?;
    Ok(())
}
