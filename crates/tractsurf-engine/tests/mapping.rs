//! End-to-end mapping against fixture surfaces.

use proptest::prelude::*;
use tractsurf_core::{FaceId, StreamlineId};
use tractsurf_engine::{Mapper, Mapping, TaskPool};
use tractsurf_space::{Surface, Tractogram};
use tractsurf_test_utils::{
    icosphere, radial_tractogram, random_walk_tractogram, single_triangle, straight_streamline,
};

fn map_with(threads: usize, t: &Tractogram, s: &Surface) -> Mapping {
    Mapper::default()
        .map(&TaskPool::new(threads), t, s)
        .unwrap()
}

#[test]
fn one_segment_through_one_triangle() {
    let s = single_triangle();
    let t = Tractogram::from_streamlines([[[0.5, 0.5, -1.0], [0.5, 0.5, 1.0]]]);
    let m = map_with(1, &t, &s);
    assert_eq!(m.face_count(), 1);
    assert_eq!(m.contact_count(FaceId(0)), 1);
    assert_eq!(m.total_contacts(), 1);
}

#[test]
fn radial_streamlines_cross_sphere_once() {
    let s = icosphere(2, 10.0);
    let t = radial_tractogram(11, 300, 20.0, 10);
    let m = map_with(4, &t, &s);
    assert_eq!(m.total_contacts(), 300);

    let mut seen = vec![0usize; 300];
    for (_, contacts) in m.iter() {
        for c in contacts {
            seen[c.streamline.0 as usize] += 1;
            // Leaving the sphere: direction agrees with the outward normal.
            assert!(c.angle < std::f32::consts::FRAC_PI_2);
        }
    }
    assert!(seen.iter().all(|&n| n == 1));
}

#[test]
fn inward_streamline_has_obtuse_angle() {
    let s = icosphere(1, 5.0);
    let t = Tractogram::from_streamlines([straight_streamline([0.3, 0.2, 12.0], [0.3, 0.2, 0.0], 4)]);
    let m = map_with(1, &t, &s);
    assert_eq!(m.total_contacts(), 1);
    let (_, contacts) = m.iter().find(|(_, c)| !c.is_empty()).unwrap();
    assert!(contacts[0].angle > std::f32::consts::FRAC_PI_2);
}

#[test]
fn thread_count_does_not_change_mapping() {
    let s = icosphere(2, 8.0);
    let t = random_walk_tractogram(3, 200, 60, 9.0, 0.7);
    let reference = map_with(1, &t, &s);
    assert!(reference.total_contacts() > 0);
    for threads in [2, 3, 8] {
        assert_eq!(map_with(threads, &t, &s), reference);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let s = icosphere(1, 6.0);
    let t = random_walk_tractogram(5, 50, 40, 7.0, 0.5);
    assert_eq!(map_with(1, &t, &s), map_with(1, &t, &s));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn contacts_are_well_formed(seed in any::<u64>(), threads in 1usize..5) {
        let s = icosphere(1, 6.0);
        let t = random_walk_tractogram(seed, 30, 30, 8.0, 0.6);
        let m = map_with(threads, &t, &s);

        let segments: usize = t.iter().map(|l| l.len().saturating_sub(1)).sum();
        prop_assert!(m.total_contacts() <= segments);

        let mut per_segment = std::collections::HashSet::new();
        for (_, contacts) in m.iter() {
            for pair in contacts.windows(2) {
                prop_assert!((pair[0].streamline, pair[0].segment) < (pair[1].streamline, pair[1].segment));
            }
            for c in contacts {
                let len = t.streamline(StreamlineId(c.streamline.0)).len();
                prop_assert!((c.segment as usize) + 1 < len);
                prop_assert!((0.0..=std::f32::consts::PI).contains(&c.angle));
                prop_assert!((tractsurf_core::geometry::norm(c.direction) - 1.0).abs() < 1e-4);
                // A segment is filed under at most one face.
                prop_assert!(per_segment.insert((c.streamline, c.segment)));
            }
        }
    }
}
