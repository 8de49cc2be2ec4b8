//! Tractogram fixtures.

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tractsurf_core::geometry::{self, Point3};
use tractsurf_space::Tractogram;

/// Deterministic random source used by the fixtures.
pub struct Rng(ChaCha8Rng);

impl Rng {
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        (self.0.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in `[lo, hi)`.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }

    /// Uniformly distributed unit vector.
    pub fn direction(&mut self) -> Point3 {
        let z = self.range(-1.0, 1.0);
        let phi = self.range(0.0, std::f32::consts::TAU);
        let r = (1.0 - z * z).max(0.0).sqrt();
        [r * phi.cos(), r * phi.sin(), z]
    }
}

/// `points` evenly spaced points from `from` to `to` inclusive.
pub fn straight_streamline(from: Point3, to: Point3, points: usize) -> Vec<Point3> {
    match points {
        0 => Vec::new(),
        1 => vec![from],
        n => (0..n)
            .map(|k| geometry::lerp(from, to, k as f32 / (n - 1) as f32))
            .collect(),
    }
}

/// `count` straight streamlines from the origin out to `length` in
/// random directions, `points` points each. Against a closed surface
/// around the origin of radius below `length`, each crosses exactly once.
pub fn radial_tractogram(seed: u64, count: usize, length: f32, points: usize) -> Tractogram {
    let mut rng = Rng::seeded(seed);
    Tractogram::from_streamlines((0..count).map(|_| {
        let end = geometry::scale(rng.direction(), length);
        straight_streamline([0.0; 3], end, points)
    }))
}

/// `count` random walks of `points` points each, starting uniformly in
/// the cube `[-extent, extent]³`, with steps of length `step`.
pub fn random_walk_tractogram(
    seed: u64,
    count: usize,
    points: usize,
    extent: f32,
    step: f32,
) -> Tractogram {
    let mut rng = Rng::seeded(seed);
    Tractogram::from_streamlines((0..count).map(|_| {
        let mut p = [
            rng.range(-extent, extent),
            rng.range(-extent, extent),
            rng.range(-extent, extent),
        ];
        let mut heading = rng.direction();
        let mut line = Vec::with_capacity(points);
        for _ in 0..points {
            line.push(p);
            // Bend gently so walks stay fibre-like.
            heading = geometry::normalize(geometry::add(heading, geometry::scale(rng.direction(), 0.3)))
                .unwrap_or(heading);
            p = geometry::add(p, geometry::scale(heading, step));
        }
        line
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_reproduce() {
        let a = random_walk_tractogram(7, 10, 20, 5.0, 0.5);
        let b = random_walk_tractogram(7, 10, 20, 5.0, 0.5);
        assert_eq!(a.points(), b.points());
        let c = random_walk_tractogram(8, 10, 20, 5.0, 0.5);
        assert_ne!(a.points(), c.points());
    }

    #[test]
    fn straight_streamline_endpoints() {
        let s = straight_streamline([0.0; 3], [3.0, 0.0, 0.0], 4);
        assert_eq!(s, vec![[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        assert!(straight_streamline([0.0; 3], [1.0; 3], 0).is_empty());
    }

    #[test]
    fn unit_range_and_directions() {
        let mut rng = Rng::seeded(1);
        for _ in 0..1000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
            let d = rng.direction();
            assert!((geometry::norm(d) - 1.0).abs() < 1e-4);
        }
    }
}
