//! Surface fixtures.

use std::collections::HashMap;

use tractsurf_core::geometry::{self, Point3};
use tractsurf_space::Surface;

/// The right triangle `(0,0,0), (2,0,0), (0,2,0)`: area 2, normal `+z`.
pub fn single_triangle() -> Surface {
    build(
        vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
        vec![[0, 1, 2]],
    )
}

/// The unit square in `z = 0` split along its `(1,0)–(0,1)` diagonal
/// into two faces of area 0.5, both with normal `+z`.
pub fn unit_square() -> Surface {
    build(
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ],
        vec![[0, 1, 2], [1, 3, 2]],
    )
}

/// A sphere of the given radius centred on the origin, made by
/// subdividing an icosahedron. Faces are wound so normals point
/// outwards. `subdivisions = 0` is the icosahedron itself (20 faces);
/// each level multiplies the face count by four.
pub fn icosphere(subdivisions: u32, radius: f32) -> Surface {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let mut vertices: Vec<Point3> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .into_iter()
    .map(|v| on_sphere(v, radius))
    .collect();
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, vertices: &mut Vec<Point3>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let m = geometry::lerp(vertices[a as usize], vertices[b as usize], 0.5);
                vertices.push(on_sphere(m, radius));
                (vertices.len() - 1) as u32
            })
        };
        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut vertices);
            let bc = midpoint(b, c, &mut vertices);
            let ca = midpoint(c, a, &mut vertices);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }
    build(vertices, faces)
}

fn on_sphere(v: Point3, radius: f32) -> Point3 {
    geometry::scale(geometry::normalize(v).unwrap_or([0.0, 0.0, 1.0]), radius)
}

fn build(vertices: Vec<Point3>, faces: Vec<[u32; 3]>) -> Surface {
    match Surface::new(vertices, faces) {
        Ok(s) => s,
        Err(e) => panic!("fixture surface is malformed: {e}"),
    }
}
