use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use conic_arc::export::writer_for_path;
use conic_arc::geometry::entry::{atmosphere_relative_velocity, flight_path_angle};
use conic_arc::geometry::relative_angles_batch;
use conic_arc::scenario::load_relative;
use conic_core::units::rad_to_deg;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Phase, conjunction, incidence, and flight path angles at a target body"
)]
struct Cli {
    /// Scenario CSV of body-relative Sun, Earth, and spacecraft vectors
    #[arg(long)]
    input: PathBuf,

    /// Body rotation period in days; when given, the flight path angle is
    /// taken relative to the co-rotating atmosphere
    #[arg(long)]
    rotation_period_days: Option<f64>,

    /// Output path, `-` for stdout
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let rows = load_relative(&cli.input)?;
    let angles = relative_angles_batch(
        &rows.body_to_sun,
        &rows.body_to_earth,
        &rows.positions_km,
        &rows.velocities_km_s,
    )?;

    let mut writer = writer_for_path(&cli.output)?;
    writeln!(
        writer,
        "index,phase_deg,conjunction_deg,incidence_deg,flight_path_deg"
    )?;
    for i in 0..rows.len() {
        let (Some(a), Some(r), Some(v)) = (
            angles.get(i),
            rows.positions_km.get(i),
            rows.velocities_km_s.get(i),
        ) else {
            continue;
        };
        let velocity = match cli.rotation_period_days {
            Some(period) => atmosphere_relative_velocity(r, v, period)?,
            None => *v,
        };
        let gamma = flight_path_angle(r, &velocity)?;
        writeln!(
            writer,
            "{},{:.6},{:.6},{:.6},{:.6}",
            i,
            rad_to_deg(a.phase_rad),
            rad_to_deg(a.conjunction_rad),
            rad_to_deg(a.incidence_rad),
            rad_to_deg(gamma),
        )?;
    }
    writer.flush()?;
    Ok(())
}
