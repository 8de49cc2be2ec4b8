//! Read-only inputs shared by every feature pass.

use tractsurf_core::FaceId;
use tractsurf_engine::{Mapping, TaskPool};
use tractsurf_space::{Surface, SurfaceGeometry};

use crate::error::AggregateError;

/// Everything a [`Feature`](crate::Feature) reads: the pool to run on,
/// the surface geometry and the mapping. Nothing here is mutated while
/// a pass runs.
#[derive(Clone, Copy, Debug)]
pub struct AggregateContext<'a> {
    pool: &'a TaskPool,
    geometry: &'a SurfaceGeometry,
    mapping: &'a Mapping,
}

impl<'a> AggregateContext<'a> {
    /// Bundle the inputs, checking the mapping was built for `surface`.
    pub fn new(
        pool: &'a TaskPool,
        surface: &'a Surface,
        mapping: &'a Mapping,
    ) -> Result<Self, AggregateError> {
        if mapping.face_count() != surface.face_count() {
            return Err(AggregateError::MappingMismatch {
                mapping_faces: mapping.face_count(),
                surface_faces: surface.face_count(),
            });
        }
        Ok(Self {
            pool,
            geometry: surface.geometry(),
            mapping,
        })
    }

    /// The pool passes run on.
    pub fn pool(&self) -> &'a TaskPool {
        self.pool
    }

    /// Surface geometry.
    pub fn geometry(&self) -> &'a SurfaceGeometry {
        self.geometry
    }

    /// The mapping being aggregated.
    pub fn mapping(&self) -> &'a Mapping {
        self.mapping
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.geometry.face_count()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    /// Contacts filed under face `f`.
    pub fn contact_count(&self, f: usize) -> usize {
        self.mapping.contact_count(FaceId(f as u32))
    }
}
