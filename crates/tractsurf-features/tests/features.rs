//! Feature identities on fixture surfaces.

use proptest::prelude::*;
use tractsurf_core::geometry;
use tractsurf_core::{FaceId, Field};
use tractsurf_engine::{Mapper, Mapping, TaskPool};
use tractsurf_features::{compute, AggregateContext, FeatureFields, FeatureKind};
use tractsurf_space::{Surface, Tractogram};
use tractsurf_test_utils::{icosphere, random_walk_tractogram, single_triangle, unit_square};

fn run(threads: usize, kind: FeatureKind, s: &Surface, t: &Tractogram) -> (Mapping, FeatureFields) {
    let pool = TaskPool::new(threads);
    let m = Mapper::default().map(&pool, t, s).unwrap();
    let ctx = AggregateContext::new(&pool, s, &m).unwrap();
    let out = compute(kind, &ctx, "x").unwrap();
    (m, out)
}

fn floats(f: &Field) -> &[f32] {
    f.floats().unwrap()
}

fn through_triangle() -> Tractogram {
    Tractogram::from_streamlines([[[0.5, 0.5, -1.0], [0.5, 0.5, 1.0]]])
}

#[test]
fn single_crossing_density_and_count() {
    let s = single_triangle();
    let t = through_triangle();

    let (_, density) = run(1, FeatureKind::StreamlineDensity, &s, &t);
    assert_eq!(floats(&density.face), &[0.5]);
    assert_eq!(floats(&density.vertex), &[0.5, 0.5, 0.5]);

    let (_, count) = run(1, FeatureKind::StreamlineCount, &s, &t);
    assert_eq!(count.face.ints().unwrap(), &[1]);
    assert_eq!(floats(&count.vertex), &[1.0, 1.0, 1.0]);
}

#[test]
fn single_crossing_angle_and_direction() {
    let s = single_triangle();
    let t = through_triangle();

    let (_, angle) = run(1, FeatureKind::ContactAngle, &s, &t);
    assert!(floats(&angle.face)[0].abs() < 1e-6);

    let (_, dir) = run(1, FeatureKind::ContactDirection, &s, &t);
    // |(0,0,1)| / 2, normalised by its own norm.
    assert_eq!(floats(&dir.face), &[0.0, 0.0, 1.0]);
    assert_eq!(&floats(&dir.vertex)[..3], &[0.0, 0.0, 1.0]);
}

#[test]
fn no_contacts_gives_zero_everywhere() {
    let s = unit_square();
    let t = Tractogram::from_streamlines([[[5.0, 5.0, -1.0], [5.0, 5.0, 1.0]]]);
    for kind in FeatureKind::ALL {
        let (m, out) = run(2, kind, &s, &t);
        assert_eq!(m.total_contacts(), 0);
        match out.face.data().as_int() {
            Some(ints) => assert!(ints.iter().all(|&v| v == 0)),
            None => assert!(floats(&out.face).iter().all(|&v| v == 0.0)),
        }
        assert!(floats(&out.vertex).iter().all(|&v| v == 0.0));
    }
}

#[test]
fn unreferenced_vertex_is_zero() {
    let s = Surface::new(
        vec![
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [9.0, 9.0, 9.0],
        ],
        vec![[0, 1, 2]],
    )
    .unwrap();
    let (_, out) = run(1, FeatureKind::StreamlineDensity, &s, &through_triangle());
    assert_eq!(floats(&out.vertex), &[0.5, 0.5, 0.5, 0.0]);
}

#[test]
fn shared_vertices_average_their_faces() {
    let s = unit_square();
    // Two crossings in face 0, none in face 1.
    let t = Tractogram::from_streamlines([
        [[0.2, 0.2, -1.0], [0.2, 0.2, 1.0]],
        [[0.3, 0.1, 1.0], [0.3, 0.1, -1.0]],
    ]);
    let (m, count) = run(1, FeatureKind::StreamlineCount, &s, &t);
    assert_eq!(m.contact_count(FaceId(0)), 2);
    assert_eq!(count.face.ints().unwrap(), &[2, 0]);
    // Vertex 0 touches face 0 only; 1 and 2 touch both; 3 touches face 1.
    assert_eq!(floats(&count.vertex), &[2.0, 1.0, 1.0, 0.0]);

    let (_, density) = run(1, FeatureKind::StreamlineDensity, &s, &t);
    assert_eq!(floats(&density.face), &[4.0, 0.0]);
    assert_eq!(floats(&density.vertex), &[4.0, 2.0, 2.0, 0.0]);

    let (_, angle) = run(1, FeatureKind::ContactAngle, &s, &t);
    let mean = floats(&angle.face)[0];
    assert!((mean - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    // Face 1 has no contacts, so it carries no weight.
    assert!((floats(&angle.vertex)[1] - mean).abs() < 1e-6);
    assert_eq!(floats(&angle.vertex)[3], 0.0);
}

#[test]
fn thread_count_does_not_change_features() {
    let s = icosphere(2, 8.0);
    let t = random_walk_tractogram(9, 150, 50, 9.0, 0.7);
    for kind in FeatureKind::ALL {
        let (_, reference) = run(1, kind, &s, &t);
        for threads in [2, 5] {
            let (_, out) = run(threads, kind, &s, &t);
            assert_eq!(out, reference, "{kind} differs with {threads} threads");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn face_identities_hold(seed in any::<u64>()) {
        let s = icosphere(1, 6.0);
        let t = random_walk_tractogram(seed, 40, 40, 8.0, 0.6);
        let g = s.geometry();

        let (m, count) = run(3, FeatureKind::StreamlineCount, &s, &t);
        let (_, density) = run(3, FeatureKind::StreamlineDensity, &s, &t);
        let (_, angle) = run(3, FeatureKind::ContactAngle, &s, &t);
        let (_, dir) = run(3, FeatureKind::ContactDirection, &s, &t);

        let counts = count.face.ints().unwrap();
        prop_assert_eq!(counts.iter().map(|&c| c as usize).sum::<usize>(), m.total_contacts());
        let mut max_norm = 0.0f32;
        for f in 0..s.face_count() {
            let n = m.contact_count(FaceId(f as u32));
            prop_assert_eq!(counts[f] as usize, n);
            let expected = n as f32 / g.area(f);
            prop_assert!((floats(&density.face)[f] - expected).abs() <= 1e-5 * expected.max(1.0));
            let a = floats(&angle.face)[f];
            prop_assert!((0.0..=std::f32::consts::PI).contains(&a));
            if n == 0 {
                prop_assert_eq!(a, 0.0);
            }
            let d = &floats(&dir.face)[3 * f..3 * f + 3];
            prop_assert!(d.iter().all(|&x| x >= 0.0));
            max_norm = max_norm.max(geometry::norm([d[0], d[1], d[2]]));
        }
        if m.total_contacts() > 0 {
            prop_assert!((max_norm - 1.0).abs() < 1e-5);
        }

        // Vertex values are weighted averages of incident face values.
        for v in 0..s.vertex_count() {
            let faces = g.neighboring_faces(v);
            let vals: Vec<f32> = faces.iter().map(|&f| floats(&density.face)[f as usize]).collect();
            let lo = vals.iter().copied().fold(f32::INFINITY, f32::min);
            let hi = vals.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let x = floats(&density.vertex)[v];
            prop_assert!(x >= lo - 1e-4 && x <= hi + 1e-4);
        }
    }
}
