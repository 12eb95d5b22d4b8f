//! Export helpers for propagated arcs in CSV and JSON.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use conic_propagation::OrbitArc;

/// Output encoding for a set of arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcFormat {
    /// One JSON document holding every arc.
    Json,
    /// One row per sample.
    Csv,
}

impl ArcFormat {
    /// Format implied by the output file extension; stdout and unknown
    /// extensions give `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(ArcFormat::Csv)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(ArcFormat::Json)
        } else {
            None
        }
    }

    pub fn write(
        self,
        writer: &mut dyn Write,
        body: Option<&str>,
        arcs: &[OrbitArc],
    ) -> io::Result<()> {
        match self {
            ArcFormat::Json => arc::write_json(writer, body, arcs),
            ArcFormat::Csv => arc::write_csv(writer, arcs),
        }
    }
}

/// Buffered writer for an output path; `-` is stdout. Missing parent
/// directories are created, and failures name the path.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    let with_path = |err: io::Error| io::Error::new(err.kind(), format!("{}: {err}", path.display()));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(with_path)?;
    }
    let file = File::create(path).map_err(with_path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod epoch {
    use chrono::{DateTime, SecondsFormat, Utc};

    /// Unix time of 2000-01-01T12:00:00.
    pub const J2000_UNIX_S: i64 = 946_728_000;

    /// Calendar instant of an epoch given in seconds past J2000 noon.
    ///
    /// The J2000 offset is applied on the UTC scale; leap seconds and the
    /// TT-UTC difference are not modelled.
    pub fn to_datetime(epoch_s: f64) -> Option<DateTime<Utc>> {
        if !epoch_s.is_finite() {
            return None;
        }
        let millis = (epoch_s * 1000.0).round();
        if millis.abs() > i64::MAX as f64 / 2.0 {
            return None;
        }
        DateTime::from_timestamp_millis(J2000_UNIX_S * 1000 + millis as i64)
    }

    /// ISO-8601 UTC string with millisecond precision, e.g. `2000-01-01T12:00:00.000Z`.
    pub fn to_utc_string(epoch_s: f64) -> Option<String> {
        to_datetime(epoch_s).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

pub mod arc {
    use std::io::{self, Write};

    use conic_geometry::SphericalCoord;
    use conic_propagation::OrbitArc;
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use crate::epoch::to_utc_string;

    const HEADER: &str = "arc,sample,x_km,y_km,z_km,vx_km_s,vy_km_s,vz_km_s,true_anomaly_rad,time_s,utc,height_km,latitude_deg,longitude_deg";

    /// Point of an arc as height over the frame origin, latitude, and longitude.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct LatLongHeight {
        pub height_km: f64,
        pub latitude_deg: f64,
        pub longitude_deg: f64,
    }

    impl From<SphericalCoord> for LatLongHeight {
        fn from(s: SphericalCoord) -> Self {
            Self {
                height_km: s.radius,
                latitude_deg: s.elevation_deg,
                longitude_deg: s.azimuth_deg,
            }
        }
    }

    /// Serialized form of one arc.
    #[derive(Debug, Clone, Serialize)]
    pub struct ArcRecord {
        pub index: usize,
        pub positions_km: Vec<[f64; 3]>,
        pub velocities_km_s: Vec<[f64; 3]>,
        pub true_anomaly_rad: Vec<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub times_s: Option<Vec<f64>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub utc: Option<Vec<Option<String>>>,
        pub lat_long_height: Vec<LatLongHeight>,
    }

    impl ArcRecord {
        pub fn from_arc(index: usize, arc: &OrbitArc) -> Self {
            let times_s = arc.times_s().map(<[f64]>::to_vec);
            let utc = times_s
                .as_ref()
                .map(|times| times.iter().map(|&t| to_utc_string(t)).collect());
            Self {
                index,
                positions_km: arc.positions_km().to_vec(),
                velocities_km_s: arc.velocities_km_s().to_vec(),
                true_anomaly_rad: arc.true_anomaly_rad().to_vec(),
                times_s,
                utc,
                lat_long_height: arc.to_spherical().iter().map(LatLongHeight::from).collect(),
            }
        }
    }

    /// Top-level JSON document.
    #[derive(Debug, Clone, Serialize)]
    pub struct ArcDocument<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub body: Option<&'a str>,
        pub arcs: Vec<ArcRecord>,
    }

    impl<'a> ArcDocument<'a> {
        pub fn new(body: Option<&'a str>, arcs: &[OrbitArc]) -> Self {
            Self {
                body,
                arcs: arcs
                    .iter()
                    .enumerate()
                    .map(|(i, arc)| ArcRecord::from_arc(i, arc))
                    .collect(),
            }
        }
    }

    /// Write arcs as a pretty-printed JSON document.
    pub fn write_json(
        writer: &mut dyn Write,
        body: Option<&str>,
        arcs: &[OrbitArc],
    ) -> io::Result<()> {
        let document = ArcDocument::new(body, arcs);
        to_writer_pretty(&mut *writer, &document)?;
        writeln!(writer)
    }

    /// Write the CSV sample table header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// Write one CSV row per sample of every arc. Time columns are left
    /// empty for arcs propagated without times.
    pub fn write_csv(writer: &mut dyn Write, arcs: &[OrbitArc]) -> io::Result<()> {
        write_header(writer)?;
        for (arc_index, arc) in arcs.iter().enumerate() {
            let spherical = arc.to_spherical();
            let times = arc.times_s();
            for (k, (r, v)) in arc
                .positions_km()
                .iter()
                .zip(arc.velocities_km_s())
                .enumerate()
            {
                let (time, utc) = match times.map(|t| t[k]) {
                    Some(t) => (t.to_string(), to_utc_string(t).unwrap_or_default()),
                    None => (String::new(), String::new()),
                };
                let llh = spherical.get(k).map(LatLongHeight::from);
                let (height, lat, lon) = llh
                    .map(|p| (p.height_km, p.latitude_deg, p.longitude_deg))
                    .unwrap_or((f64::NAN, f64::NAN, f64::NAN));
                writeln!(
                    writer,
                    "{},{},{:.6},{:.6},{:.6},{:.9},{:.9},{:.9},{:.9},{},{},{:.6},{:.6},{:.6}",
                    arc_index,
                    k,
                    r[0],
                    r[1],
                    r[2],
                    v[0],
                    v[1],
                    v[2],
                    arc.true_anomaly_rad()[k],
                    time,
                    utc,
                    height,
                    lat,
                    lon,
                )?;
            }
        }
        Ok(())
    }
}
