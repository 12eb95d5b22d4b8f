use std::f64::consts::PI;

use approx::assert_relative_eq;
use conic_arc::orbits::{ConicAnchor, time_of_flight, time_of_flight_anchored};
use conic_core::{ConicError, DomainError, InputError};

const MU_EARTH: f64 = 398_600.4418; // km^3 / s^2

/// In-plane position on a conic with periapsis along +x.
fn point(p: f64, e: f64, nu: f64) -> [f64; 3] {
    let r = p / (1.0 + e * nu.cos());
    [r * nu.cos(), r * nu.sin(), 0.0]
}

/// Mean anomaly of an ellipse at true anomaly `nu`.
fn mean_anomaly(e: f64, nu: f64) -> f64 {
    let big_e = 2.0 * ((1.0 - e).sqrt() * (0.5 * nu).sin()).atan2((1.0 + e).sqrt() * (0.5 * nu).cos());
    big_e - e * big_e.sin()
}

/// Hyperbolic mean anomaly at true anomaly `nu`.
fn hyperbolic_mean_anomaly(e: f64, nu: f64) -> f64 {
    let h = 2.0 * (((e - 1.0) / (e + 1.0)).sqrt() * (0.5 * nu).tan()).atanh();
    e * h.sinh() - h
}

#[test]
fn elliptic_time_matches_kepler_equation() {
    let (a, e) = (10_000.0_f64, 0.3_f64);
    let p = a * (1.0 - e * e);
    let n = (MU_EARTH / a.powi(3)).sqrt();

    for (nu0, nu1) in [(0.3_f64, 1.2_f64), (0.3, 4.0), (5.0, 0.5), (2.0, 6.0)] {
        let dnu = (nu1 - nu0).rem_euclid(2.0 * PI);
        let tof = time_of_flight(&point(p, e, nu0), &[point(p, e, nu1)], p, &[dnu], MU_EARTH)
            .expect("elliptic tof");
        let expected = (mean_anomaly(e, nu1) - mean_anomaly(e, nu0)).rem_euclid(2.0 * PI) / n;
        assert_relative_eq!(tof[0], expected, max_relative = 1e-9);
    }
}

#[test]
fn hyperbolic_time_matches_kepler_equation() {
    let (a, e) = (-20_000.0_f64, 1.5_f64);
    let p = a * (1.0 - e * e);
    let (nu0, nu1) = (-1.0_f64, 1.2_f64);
    let tof = time_of_flight(&point(p, e, nu0), &[point(p, e, nu1)], p, &[nu1 - nu0], MU_EARTH)
        .expect("hyperbolic tof");
    let n = (MU_EARTH / (-a).powi(3)).sqrt();
    let expected = (hyperbolic_mean_anomaly(e, nu1) - hyperbolic_mean_anomaly(e, nu0)) / n;
    assert_relative_eq!(tof[0], expected, max_relative = 1e-9);
}

#[test]
fn parabolic_time_matches_barker_equation() {
    let p = 20_000.0_f64;
    let barker = |nu: f64| {
        let d = (0.5 * nu).tan();
        0.5 * (p.powi(3) / MU_EARTH).sqrt() * (d + d.powi(3) / 3.0)
    };
    for (nu0, nu1) in [(-1.0_f64, 1.0_f64), (-2.0, 2.2), (0.1, 0.5)] {
        let tof = time_of_flight(
            &point(p, 1.0, nu0),
            &[point(p, 1.0, nu1)],
            p,
            &[nu1 - nu0],
            MU_EARTH,
        )
        .expect("parabolic tof");
        assert_relative_eq!(tof[0], barker(nu1) - barker(nu0), max_relative = 1e-9);
    }
}

#[test]
fn time_grows_with_transfer_angle() {
    for (a, e) in [(12_000.0_f64, 0.4_f64), (-15_000.0, 1.8)] {
        let p = a * (1.0 - e * e);
        let nu0 = -0.9;
        let sweeps: Vec<f64> = (1..=10).map(|k| 0.17 * k as f64).collect();
        let points: Vec<[f64; 3]> = sweeps.iter().map(|d| point(p, e, nu0 + d)).collect();
        let tof = time_of_flight(&point(p, e, nu0), &points, p, &sweeps, MU_EARTH).expect("tof");
        assert!(tof[0] > 0.0);
        for pair in tof.windows(2) {
            assert!(pair[1] > pair[0], "time of flight must increase: {:?}", tof);
        }
    }
}

#[test]
fn zero_sweep_takes_no_time_and_full_turns_are_dropped() {
    let (a, e) = (9_000.0_f64, 0.1_f64);
    let p = a * (1.0 - e * e);
    let r0 = point(p, e, 0.4);
    let tof = time_of_flight(&r0, &[r0, r0], p, &[0.0, 2.0 * PI], MU_EARTH).expect("tof");
    assert_eq!(tof, vec![0.0, 0.0]);

    let r1 = point(p, e, 1.4);
    let once = time_of_flight(&r0, &[r1], p, &[1.0], MU_EARTH).expect("tof");
    let wrapped = time_of_flight(&r0, &[r1], p, &[1.0 + 2.0 * PI], MU_EARTH).expect("tof");
    assert_relative_eq!(once[0], wrapped[0], max_relative = 1e-9);
}

#[test]
fn negative_sweep_wraps_forward() {
    let (a, e) = (9_000.0_f64, 0.1_f64);
    let p = a * (1.0 - e * e);
    let r0 = point(p, e, 1.0);
    let r1 = point(p, e, 0.5);
    let tof = time_of_flight(&r0, &[r1], p, &[-0.5], MU_EARTH).expect("tof");
    let period = 2.0 * PI * (a.powi(3) / MU_EARTH).sqrt();
    assert!(tof[0] > 0.5 * period && tof[0] < period, "tof = {}", tof[0]);
}

#[test]
fn chord_form_rejects_sweeps_near_a_half_or_whole_turn() {
    let (a, e) = (9_000.0_f64, 0.1_f64);
    let p = a * (1.0 - e * e);
    let nu0 = 0.2;
    for dnu in [PI, PI - 1e-9, PI + 1e-6, PI - 1e-3, 2.0 * PI - 1e-9, 1e-9] {
        let err = time_of_flight(&point(p, e, nu0), &[point(p, e, nu0 + dnu)], p, &[dnu], MU_EARTH)
            .unwrap_err();
        assert!(
            matches!(err, ConicError::Domain(DomainError::SingularTransferAngle { .. })),
            "sweep {dnu} gave {err:?}"
        );
    }
}

#[test]
fn anchored_time_matches_kepler_equation_near_a_half_turn() {
    let (a, e) = (10_000.0_f64, 0.3_f64);
    let p = a * (1.0 - e * e);
    let n = (MU_EARTH / a.powi(3)).sqrt();
    let nu0 = 0.3;
    let anchor = ConicAnchor {
        eccentricity: e,
        true_anomaly_rad: nu0,
    };

    let sweeps = [PI - 1e-9, PI, PI + 1e-9, PI + 1e-6, PI - 1e-3, PI + 3e-3];
    let points: Vec<[f64; 3]> = sweeps.iter().map(|d| point(p, e, nu0 + d)).collect();
    let tof = time_of_flight_anchored(&point(p, e, nu0), &points, p, &sweeps, MU_EARTH, &anchor)
        .expect("anchored tof");
    for (t, dnu) in tof.iter().zip(sweeps) {
        let expected = (mean_anomaly(e, nu0 + dnu) - mean_anomaly(e, nu0)).rem_euclid(2.0 * PI) / n;
        assert_relative_eq!(*t, expected, max_relative = 1e-9);
    }
    assert_relative_eq!(tof[1], 5_561.457_642_866, max_relative = 1e-9);
}

#[test]
fn anchored_time_is_continuous_near_a_whole_turn() {
    let (a, e) = (9_000.0_f64, 0.1_f64);
    let p = a * (1.0 - e * e);
    let period = 2.0 * PI * (a.powi(3) / MU_EARTH).sqrt();
    let nu0 = 0.4;
    let anchor = ConicAnchor {
        eccentricity: e,
        true_anomaly_rad: nu0,
    };

    let sweeps = [1e-9, 2.0 * PI - 1e-9];
    let points: Vec<[f64; 3]> = sweeps.iter().map(|d| point(p, e, nu0 + d)).collect();
    let tof = time_of_flight_anchored(&point(p, e, nu0), &points, p, &sweeps, MU_EARTH, &anchor)
        .expect("anchored tof");
    assert!(tof[0] >= 0.0 && tof[0] < 1e-3, "tof = {}", tof[0]);
    assert_relative_eq!(tof[1], period, max_relative = 1e-9);
}

#[test]
fn anchored_time_on_a_hyperbola_near_a_half_turn() {
    let (a, e) = (-20_000.0_f64, 1.5_f64);
    let p = a * (1.0 - e * e);
    let n = (MU_EARTH / (-a).powi(3)).sqrt();
    let (nu0, dnu) = (-1.5_f64, PI);
    let anchor = ConicAnchor {
        eccentricity: e,
        true_anomaly_rad: nu0,
    };
    let tof = time_of_flight_anchored(
        &point(p, e, nu0),
        &[point(p, e, nu0 + dnu)],
        p,
        &[dnu],
        MU_EARTH,
        &anchor,
    )
    .expect("anchored tof");
    let expected = (hyperbolic_mean_anomaly(e, nu0 + dnu) - hyperbolic_mean_anomaly(e, nu0)) / n;
    assert_relative_eq!(tof[0], expected, max_relative = 1e-9);
}

#[test]
fn invalid_inputs_are_rejected() {
    let r0 = [7000.0, 0.0, 0.0];
    let r1 = [0.0, 7000.0, 0.0];

    let err = time_of_flight(&r0, &[r1], 7000.0, &[0.5, 1.0], MU_EARTH).unwrap_err();
    assert!(matches!(
        err,
        ConicError::Input(InputError::LengthMismatch {
            expected: 1,
            actual: 2,
            ..
        })
    ));

    let err = time_of_flight(&r0, &[r1], -1.0, &[0.5 * PI], MU_EARTH).unwrap_err();
    assert!(matches!(err, ConicError::Input(InputError::NonPositive { .. })));

    let err = time_of_flight(&r0, &[r1], 7000.0, &[0.5 * PI], -MU_EARTH).unwrap_err();
    assert!(matches!(err, ConicError::Input(InputError::NonPositiveMu(_))));

    let err = time_of_flight(&[0.0; 3], &[r1], 7000.0, &[0.5 * PI], MU_EARTH).unwrap_err();
    assert_eq!(err, ConicError::Domain(DomainError::ZeroPosition));
}
