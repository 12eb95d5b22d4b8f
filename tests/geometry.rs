use std::f64::consts::PI;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use conic_arc::geometry::entry::{
    atmosphere_relative_velocity, flight_path_angle, rotation_velocity, spin_vector,
};
use conic_arc::geometry::relative::angle_between;
use conic_arc::geometry::{relative_angles, relative_angles_batch, to_spherical, to_spherical_batch};
use conic_core::{BatchError, ConicError, DomainError, EntryError, InputError};

#[test]
fn spherical_coordinates_on_the_axes() {
    let x = to_spherical(&[1.0, 0.0, 0.0]);
    assert_eq!((x.radius, x.elevation_deg, x.azimuth_deg), (1.0, 0.0, 0.0));

    let z = to_spherical(&[0.0, 0.0, 1.0]);
    assert_eq!((z.radius, z.elevation_deg, z.azimuth_deg), (1.0, 90.0, 0.0));

    let south = to_spherical(&[0.0, 0.0, -2.0]);
    assert_eq!(south.radius, 2.0);
    assert_eq!(south.elevation_deg, -90.0);

    let y = to_spherical(&[0.0, 3.0, 0.0]);
    assert_relative_eq!(y.azimuth_deg, 90.0, epsilon = 1e-12);

    let back = to_spherical(&[-1.0, 0.0, 0.0]);
    assert_relative_eq!(back.azimuth_deg, 180.0, epsilon = 1e-12);
}

#[test]
fn spherical_batch_keeps_order() {
    let points = [[1.0, 1.0, 0.0], [0.0, 0.0, 5.0], [1.0, 0.0, 1.0]];
    let batch = to_spherical_batch(&points);
    assert_eq!(batch.len(), 3);
    for (i, p) in points.iter().enumerate() {
        assert_eq!(batch.get(i), Some(to_spherical(p)));
    }
    let diag = batch.get(2).expect("third point");
    assert_relative_eq!(diag.radius, 2f64.sqrt(), max_relative = 1e-12);
    assert_relative_eq!(diag.elevation_deg, 45.0, epsilon = 1e-12);
    assert!(batch.get(3).is_none());

    let collected: Vec<_> = batch.iter().collect();
    assert_eq!(collected.len(), 3);
    assert_eq!(batch.radius().len(), batch.elevation_deg().len());
    assert_eq!(batch.azimuth_deg().len(), 3);
    assert_eq!(batch.elevation_deg()[1], 90.0);
    assert!(to_spherical_batch(&[]).iter().next().is_none());
}

#[test]
fn relative_angles_from_orthogonal_vectors() {
    let angles = relative_angles(
        &[1.0e8, 0.0, 0.0],
        &[0.0, 2.0e8, 0.0],
        &[0.0, 0.0, 7.0e4],
        &[-5.0, 0.0, 0.0],
    )
    .expect("angles");
    assert_relative_eq!(angles.phase_rad, PI, epsilon = 1e-12);
    assert_relative_eq!(angles.conjunction_rad, 0.5 * PI, epsilon = 1e-12);
    assert_relative_eq!(angles.incidence_rad, 0.5 * PI, epsilon = 1e-12);
}

#[test]
fn parallel_vectors_stay_inside_acos_domain() {
    let v = [0.1, 0.2, 0.3];
    let scaled = [1.0e6 * 0.1, 1.0e6 * 0.2, 1.0e6 * 0.3];
    let angle = angle_between(&v, &scaled).expect("angle");
    assert!(angle.is_finite());
    assert_abs_diff_eq!(angle, 0.0, epsilon = 1e-7);
    assert_eq!(angle_between(&v, &[0.0; 3]), Err(DomainError::ZeroVector));
}

#[test]
fn relative_angle_batch_flags_bad_rows() {
    let sun = vec![[1.0, 0.0, 0.0]; 2];
    let earth = vec![[0.0, 1.0, 0.0]; 2];
    let positions = vec![[0.0, 0.0, 1.0], [0.0, 0.0, 0.0]];
    let velocities = vec![[1.0, 0.0, 0.0]; 2];
    let err = relative_angles_batch(&sun, &earth, &positions, &velocities).unwrap_err();
    assert_eq!(
        err,
        BatchError::Entry(EntryError {
            index: 1,
            source: ConicError::Domain(DomainError::ZeroVector),
        })
    );

    let err = relative_angles_batch(&sun, &earth[..1], &positions, &velocities).unwrap_err();
    assert_eq!(
        err,
        BatchError::Shape(InputError::LengthMismatch {
            field: "body-to-earth vectors",
            expected: 2,
            actual: 1,
        })
    );

    let ok = relative_angles_batch(&sun[..1], &earth[..1], &positions[..1], &velocities[..1])
        .expect("single row");
    assert_eq!(ok.len(), 1);
    assert_abs_diff_eq!(ok.phase_rad[0], 0.0, epsilon = 1e-12);
}

#[test]
fn co_rotating_atmosphere_velocity() {
    let omega = spin_vector(1.0).expect("spin");
    assert_relative_eq!(omega[2], 2.0 * PI / 86_400.0, max_relative = 1e-12);

    let surface = rotation_velocity(&[6_378.0, 0.0, 0.0], 1.0).expect("rotation");
    assert_abs_diff_eq!(surface[0], 0.0, epsilon = 1e-15);
    assert_relative_eq!(surface[1], 2.0 * PI * 6_378.0 / 86_400.0, max_relative = 1e-12);
    assert_eq!(surface[2], 0.0);

    let relative = atmosphere_relative_velocity(&[6_378.0, 0.0, 0.0], &[0.0, 7.0, 0.0], 1.0)
        .expect("relative");
    assert_relative_eq!(relative[1], 7.0 - surface[1], max_relative = 1e-12);

    assert!(matches!(
        spin_vector(0.0).unwrap_err(),
        ConicError::Input(InputError::NonPositive { .. })
    ));
}

#[test]
fn flight_path_angle_is_signed() {
    let climbing = flight_path_angle(&[1.0, 0.0, 0.0], &[1.0, 1.0, 0.0]).expect("gamma");
    assert_relative_eq!(climbing, 0.25 * PI, epsilon = 1e-12);
    let descending = flight_path_angle(&[1.0, 0.0, 0.0], &[-1.0, 1.0, 0.0]).expect("gamma");
    assert_relative_eq!(descending, -0.25 * PI, epsilon = 1e-12);
    assert_eq!(
        flight_path_angle(&[1.0, 0.0, 0.0], &[0.0; 3]),
        Err(DomainError::ZeroVector)
    );
}
