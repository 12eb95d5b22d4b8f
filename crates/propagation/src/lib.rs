//! Propagation façade crate: samples two-body arcs from a single state and
//! exposes the supporting orbit and geometry crates.

pub mod arc;
pub mod maneuver;
pub mod propagator;

pub use conic_geometry as geometry;
pub use conic_orbits as orbits;
pub use facade::*;

mod facade;
