//! Per-face geometric attributes and vertex→face adjacency.

use smallvec::SmallVec;
use tractsurf_core::geometry::{self, Point3, ZERO};

use crate::grid::FaceGrid;

/// Faces incident to one vertex. Eight inline slots cover the typical
/// valence of closed triangle meshes without heap allocation.
pub type NeighboringFaces = SmallVec<[u32; 8]>;

/// Derived, read-only geometry of a triangle mesh.
///
/// Computed once per surface (see [`Surface::geometry`](crate::Surface::geometry))
/// and shared by every worker of every stage.
#[derive(Clone, Debug)]
pub struct SurfaceGeometry {
    normals: Vec<Point3>,
    centers: Vec<Point3>,
    areas: Vec<f32>,
    edges: Vec<[Point3; 2]>,
    radii: Vec<f32>,
    neighboring_faces: Vec<NeighboringFaces>,
    grid: FaceGrid,
}

impl SurfaceGeometry {
    /// Compute all attributes for a mesh whose face indices are valid.
    pub fn compute(vertices: &[Point3], faces: &[[u32; 3]]) -> Self {
        let nf = faces.len();
        let mut normals = Vec::with_capacity(nf);
        let mut centers = Vec::with_capacity(nf);
        let mut areas = Vec::with_capacity(nf);
        let mut edges = Vec::with_capacity(nf);
        let mut radii = Vec::with_capacity(nf);
        let mut degenerate = 0usize;

        for face in faces {
            let [v0, v1, v2] = face.map(|v| vertices[v as usize]);
            let e1 = geometry::sub(v1, v0);
            let e2 = geometry::sub(v2, v0);
            let c = geometry::cross(e1, e2);
            let area = 0.5 * geometry::norm(c);
            let normal = geometry::normalize(c).unwrap_or(ZERO);
            if area <= 0.0 {
                degenerate += 1;
            }
            let center = geometry::scale(geometry::add(geometry::add(v0, v1), v2), 1.0 / 3.0);
            let radius = geometry::distance(center, v0)
                .max(geometry::distance(center, v1))
                .max(geometry::distance(center, v2));

            normals.push(normal);
            centers.push(center);
            areas.push(area);
            edges.push([e1, e2]);
            radii.push(radius);
        }
        if degenerate > 0 {
            tracing::warn!(degenerate, "surface has zero-area faces");
        }

        let mut neighboring_faces = vec![NeighboringFaces::new(); vertices.len()];
        for (f, face) in faces.iter().enumerate() {
            for &v in face {
                let list = &mut neighboring_faces[v as usize];
                // A face repeating a vertex index is listed once.
                if list.last() != Some(&(f as u32)) {
                    list.push(f as u32);
                }
            }
        }

        Self {
            normals,
            centers,
            areas,
            edges,
            radii,
            neighboring_faces,
            grid: FaceGrid::build(vertices, faces),
        }
    }

    /// Unit normal of a face (zero for a degenerate face), oriented by
    /// the right-hand rule over its vertex order.
    pub fn normal(&self, face: usize) -> Point3 {
        self.normals[face]
    }

    /// Centroid of a face.
    pub fn center(&self, face: usize) -> Point3 {
        self.centers[face]
    }

    /// Area of a face.
    pub fn area(&self, face: usize) -> f32 {
        self.areas[face]
    }

    /// The in-plane edge vectors `v1 − v0` and `v2 − v0`.
    pub fn edges(&self, face: usize) -> [Point3; 2] {
        self.edges[face]
    }

    /// Largest distance from the face center to one of its vertices.
    pub fn radius(&self, face: usize) -> f32 {
        self.radii[face]
    }

    /// All face areas, indexed by face.
    pub fn areas(&self) -> &[f32] {
        &self.areas
    }

    /// Faces incident to a vertex, in ascending face order.
    pub fn neighboring_faces(&self, vertex: usize) -> &[u32] {
        &self.neighboring_faces[vertex]
    }

    /// The face spatial index.
    pub fn grid(&self) -> &FaceGrid {
        &self.grid
    }

    /// Number of faces covered.
    pub fn face_count(&self) -> usize {
        self.areas.len()
    }

    /// Number of vertices covered.
    pub fn vertex_count(&self) -> usize {
        self.neighboring_faces.len()
    }
}
