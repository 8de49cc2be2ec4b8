//! Benchmark profiles for tractsurf.
//!
//! - [`reference_profile`]: 1280-face sphere, 2 000 radial streamlines
//! - [`stress_profile`]: 20 480-face sphere, 20 000 random walks
//!
//! Both are deterministic for a given seed.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tractsurf_space::{Surface, Tractogram};
use tractsurf_test_utils::{icosphere, radial_tractogram, random_walk_tractogram};

/// Sphere radius shared by the profiles.
pub const RADIUS: f32 = 50.0;

/// A surface and the tractogram to map onto it.
pub struct Profile {
    /// The surface.
    pub surface: Surface,
    /// The streamlines.
    pub tractogram: Tractogram,
}

/// Radial streamlines from the centre, each crossing the sphere once.
pub fn reference_profile(seed: u64) -> Profile {
    Profile {
        surface: icosphere(3, RADIUS),
        tractogram: radial_tractogram(seed, 2_000, RADIUS * 1.5, 40),
    }
}

/// Random walks filling the sphere's bounding cube; many cross several
/// faces and many never touch the surface.
pub fn stress_profile(seed: u64) -> Profile {
    Profile {
        surface: icosphere(5, RADIUS),
        tractogram: random_walk_tractogram(seed, 20_000, 100, RADIUS, 1.0),
    }
}
