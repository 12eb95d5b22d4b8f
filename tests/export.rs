use std::fs;
use std::io::Write;
use std::path::Path;

use conic_arc::export::arc::{write_csv, write_json};
use conic_arc::export::epoch::{to_datetime, to_utc_string};
use conic_arc::export::{ArcFormat, writer_for_path};
use conic_arc::propagation::{PropagationSettings, propagate_state};
use conic_core::StateVector;

fn saturn_arc(compute_time: bool) -> conic_arc::propagation::OrbitArc {
    let state = StateVector::new(
        [-52_570_775.94, -48_053_033.85, -18_714_087.83],
        [5.922, 5.413, 2.086],
        13_701.5,
        37_931_206.159,
    );
    let settings = PropagationSettings {
        sample_count: 5,
        compute_time,
        ..PropagationSettings::default()
    };
    propagate_state(&state, &settings).expect("propagate")
}

#[test]
fn j2000_epoch_formats_as_utc() {
    assert_eq!(to_utc_string(0.0).as_deref(), Some("2000-01-01T12:00:00.000Z"));
    assert_eq!(
        to_utc_string(86_400.0 + 1.5).as_deref(),
        Some("2000-01-02T12:00:01.500Z")
    );
    assert_eq!(
        to_utc_string(-43_200.0).as_deref(),
        Some("2000-01-01T00:00:00.000Z")
    );
    assert!(to_datetime(f64::NAN).is_none());
}

#[test]
fn json_document_carries_samples_and_lat_long_height() {
    let arcs = vec![saturn_arc(true)];
    let mut buffer = Vec::new();
    write_json(&mut buffer, Some("SATURN"), &arcs).expect("json");

    let doc: serde_json::Value = serde_json::from_slice(&buffer).expect("valid json");
    assert_eq!(doc["body"], "SATURN");
    let arc = &doc["arcs"][0];
    assert_eq!(arc["index"], 0);
    assert_eq!(arc["positions_km"].as_array().map(Vec::len), Some(5));
    assert_eq!(arc["times_s"][0], 13_701.5);
    assert_eq!(arc["utc"][0], "2000-01-01T15:48:21.500Z");
    let llh = &arc["lat_long_height"][4];
    let height = llh["height_km"].as_f64().expect("height");
    assert!((1.0e4..1.0e5).contains(&height));
    assert!(llh["latitude_deg"].as_f64().expect("lat").abs() <= 90.0);
}

#[test]
fn json_omits_times_when_not_computed() {
    let mut buffer = Vec::new();
    write_json(&mut buffer, None, &[saturn_arc(false)]).expect("json");
    let doc: serde_json::Value = serde_json::from_slice(&buffer).expect("valid json");
    assert!(doc.get("body").is_none());
    assert!(doc["arcs"][0].get("times_s").is_none());
    assert!(doc["arcs"][0].get("utc").is_none());
}

#[test]
fn csv_table_has_one_row_per_sample() {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, &[saturn_arc(true), saturn_arc(false)]).expect("csv");
    let text = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1 + 10);
    assert!(lines[0].starts_with("arc,sample,x_km"));
    assert!(lines[1].starts_with("0,0,"));
    assert!(lines[1].contains("13701.5,2000-01-01T15:48:21.500Z"));
    let untimed: Vec<&str> = lines[6].split(',').collect();
    assert_eq!(untimed[0], "1");
    assert_eq!(untimed[9], "");
    assert_eq!(untimed[10], "");
    assert_eq!(untimed.len(), 14);
}

#[test]
fn format_follows_output_extension() {
    assert_eq!(ArcFormat::from_path(Path::new("arcs.CSV")), Some(ArcFormat::Csv));
    assert_eq!(ArcFormat::from_path(Path::new("out/arcs.json")), Some(ArcFormat::Json));
    assert_eq!(ArcFormat::from_path(Path::new("-")), None);
    assert_eq!(ArcFormat::from_path(Path::new("arcs.txt")), None);
}

#[test]
fn writer_creates_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested/deeper/arcs.csv");
    {
        let mut writer = writer_for_path(&path).expect("writer");
        ArcFormat::Csv
            .write(&mut *writer, None, &[saturn_arc(false)])
            .expect("write csv");
        writer.flush().expect("flush");
    }
    let text = fs::read_to_string(&path).expect("read back");
    assert_eq!(text.lines().count(), 6);

    let blocked = dir.path().join("nested/deeper/arcs.csv/inside.json");
    let err = writer_for_path(&blocked).err().expect("a file cannot be a directory");
    assert!(err.to_string().contains("arcs.csv"), "{err}");
}
