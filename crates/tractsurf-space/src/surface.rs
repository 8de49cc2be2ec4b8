//! Triangle mesh surface with vertex and face fields.

use std::sync::OnceLock;

use tractsurf_core::geometry::{self, Point3};
use tractsurf_core::{FieldCollection, FieldDomain, FieldHost, FieldOwner};

use crate::error::SpaceError;
use crate::geometry::SurfaceGeometry;

/// A triangulated surface.
///
/// Vertices and faces are fixed at construction; only the field
/// collection is mutable afterwards. Derived geometry is computed on
/// first use and then shared read-only.
#[derive(Clone, Debug)]
pub struct Surface {
    vertices: Vec<Point3>,
    faces: Vec<[u32; 3]>,
    fields: FieldCollection,
    geometry: OnceLock<SurfaceGeometry>,
}

impl Surface {
    /// Create a surface, checking that every face index names a vertex.
    pub fn new(vertices: Vec<Point3>, faces: Vec<[u32; 3]>) -> Result<Self, SpaceError> {
        let vertex_count = vertices.len();
        for (face, tri) in faces.iter().enumerate() {
            if let Some(&vertex) = tri.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(SpaceError::FaceIndexOutOfRange {
                    face,
                    vertex,
                    vertex_count,
                });
            }
        }
        Ok(Self {
            vertices,
            faces,
            fields: FieldCollection::new(FieldDomain::Surface),
            geometry: OnceLock::new(),
        })
    }

    /// Number of vertices (`nv`).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces (`nf`).
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertex coordinates.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Face vertex indices.
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Derived geometry, computed once on first access.
    pub fn geometry(&self) -> &SurfaceGeometry {
        self.geometry.get_or_init(|| {
            tracing::debug!(
                vertices = self.vertices.len(),
                faces = self.faces.len(),
                "computing surface geometry"
            );
            SurfaceGeometry::compute(&self.vertices, &self.faces)
        })
    }

    /// Axis-aligned bounds of the vertices, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        geometry::bounding_box(&self.vertices)
    }
}

impl FieldHost for Surface {
    fn cardinality(&self, owner: FieldOwner) -> Option<usize> {
        match owner {
            FieldOwner::Vertex => Some(self.vertices.len()),
            FieldOwner::Face => Some(self.faces.len()),
            FieldOwner::Point | FieldOwner::Streamline => None,
        }
    }

    fn fields(&self) -> &FieldCollection {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldCollection {
        &mut self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tractsurf_core::{DataType, FieldError};

    fn triangle() -> Surface {
        Surface::new(
            vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn rejects_out_of_range_face_index() {
        let err = Surface::new(vec![[0.0; 3]; 3], vec![[0, 1, 3]]).unwrap_err();
        assert_eq!(
            err,
            SpaceError::FaceIndexOutOfRange {
                face: 0,
                vertex: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn geometry_is_cached() {
        let s = triangle();
        let a = s.geometry() as *const SurfaceGeometry;
        let b = s.geometry() as *const SurfaceGeometry;
        assert_eq!(a, b);
        assert_eq!(s.geometry().area(0), 2.0);
    }

    #[test]
    fn field_owners_are_sized_by_mesh() {
        let mut s = triangle();
        let f = s
            .create_field("curv", FieldOwner::Vertex, DataType::Float, 1)
            .unwrap();
        assert_eq!(f.cardinality(), 3);
        let f = s
            .create_field("label", FieldOwner::Face, DataType::Int, 2)
            .unwrap();
        assert_eq!(f.data().len(), 2);
    }

    #[test]
    fn tractogram_owner_is_rejected() {
        let mut s = triangle();
        let err = s
            .create_field("x", FieldOwner::Point, DataType::Float, 1)
            .unwrap_err();
        assert!(matches!(err, FieldError::OwnerMismatch { .. }));
        assert!(s.fields().is_empty());
    }

    #[test]
    fn empty_surface_has_no_bounds_and_no_face_fields() {
        let mut s = Surface::new(Vec::new(), Vec::new()).unwrap();
        assert!(s.bounding_box().is_none());
        let err = s
            .create_field("x", FieldOwner::Face, DataType::Float, 1)
            .unwrap_err();
        assert!(matches!(err, FieldError::EmptyOwner { .. }));
    }
}
