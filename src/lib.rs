//! Conic arc propagation and viewing geometry.
//!
//! The numerical work lives in the workspace crates; this crate ties them
//! together with the CSV scenario loader shared by the command-line
//! front-ends.

pub mod scenario;

pub use conic_config as config;
pub use conic_export as export;
pub use conic_geometry as geometry;
pub use conic_orbits as orbits;
pub use conic_propagation as propagation;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
