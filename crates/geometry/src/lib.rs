//! Viewing and entry geometry built on the shared vector primitives.

pub mod entry;
pub mod relative;
pub mod spherical;

pub use relative::{RelativeAngles, relative_angles, relative_angles_batch};
pub use spherical::{SphericalBatch, SphericalCoord, to_spherical, to_spherical_batch};
