//! Two-body orbit geometry: element extraction, perifocal rotation, and
//! closed-form time of flight between points on one conic.

pub mod elements;
pub mod frame;
pub mod tof;

pub use elements::{ConicFamily, ElementsBatch, KeplerianElements, extract, extract_batch};
pub use frame::PerifocalBasis;
pub use tof::{ConicAnchor, time_of_flight, time_of_flight_anchored};
