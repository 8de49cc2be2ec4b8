//! Test fixtures for tractsurf development.
//!
//! Deterministic surfaces ([`single_triangle`], [`unit_square`],
//! [`icosphere`]) and tractograms ([`straight_streamline`],
//! [`radial_tractogram`], [`random_walk_tractogram`]) shared by unit
//! tests, integration tests and benchmarks. Random fixtures are seeded
//! ChaCha8 streams, so a seed always reproduces the same data.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod meshes;
pub mod tracts;

pub use meshes::{icosphere, single_triangle, unit_square};
pub use tracts::{radial_tractogram, random_walk_tractogram, straight_streamline, Rng};
