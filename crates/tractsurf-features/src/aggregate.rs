//! Running a feature end to end and packaging its fields.

use tractsurf_core::{Field, FieldData, FieldError, FieldHost, FieldOwner};
use tractsurf_space::Surface;

use crate::context::AggregateContext;
use crate::error::AggregateError;
use crate::feature::FeatureKind;

/// Name of the face field for a base name: `face_<name>`.
pub fn face_field_name(name: &str) -> String {
    format!("face_{name}")
}

/// Name of the vertex field for a base name: `vertex_<name>`.
pub fn vertex_field_name(name: &str) -> String {
    format!("vertex_{name}")
}

/// The two fields produced by one feature.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureFields {
    /// `face_<name>`, owner `FACE`.
    pub face: Field,
    /// `vertex_<name>`, owner `VERTEX`, always float.
    pub vertex: Field,
}

impl FeatureFields {
    /// Append both fields to `surface`.
    ///
    /// Either both are attached or neither: a name collision on the
    /// vertex field is detected before the face field is added.
    pub fn attach(self, surface: &mut Surface) -> Result<(), FieldError> {
        for name in [self.face.name(), self.vertex.name()] {
            if surface.fields().contains(name) {
                return Err(FieldError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }
        surface.attach_field(self.face)?;
        surface.attach_field(self.vertex)?;
        Ok(())
    }
}

/// Compute `kind` over `ctx` and build the `face_<name>` and
/// `vertex_<name>` fields.
///
/// The vertex pass starts only after the face pass has completed.
pub fn compute(
    kind: FeatureKind,
    ctx: &AggregateContext<'_>,
    name: &str,
) -> Result<FeatureFields, AggregateError> {
    let feature = kind.feature();
    let dimension = feature.dimension();

    let faces = feature.reduce_faces(ctx)?;
    tracing::debug!(feature = %kind, faces = ctx.face_count(), "face pass complete");
    let vertices = feature.propagate_vertices(ctx, &faces)?;
    tracing::debug!(feature = %kind, vertices = ctx.vertex_count(), "vertex pass complete");

    let face = Field::from_data(
        face_field_name(name),
        FieldOwner::Face,
        dimension,
        ctx.face_count(),
        faces,
    )?;
    let vertex = Field::from_data(
        vertex_field_name(name),
        FieldOwner::Vertex,
        dimension,
        ctx.vertex_count(),
        FieldData::Float(vertices),
    )?;
    tracing::info!(
        feature = %kind,
        face = face.name(),
        vertex = vertex.name(),
        "feature computed"
    );
    Ok(FeatureFields { face, vertex })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tractsurf_core::DataType;
    use tractsurf_engine::{Mapper, TaskPool};
    use tractsurf_space::Tractogram;
    use tractsurf_test_utils::single_triangle;

    fn crossing() -> (Surface, tractsurf_engine::Mapping) {
        let s = single_triangle();
        let t = Tractogram::from_streamlines([[[0.5, 0.5, -1.0], [0.5, 0.5, 1.0]]]);
        let m = Mapper::default().map(&TaskPool::new(1), &t, &s).unwrap();
        (s, m)
    }

    #[test]
    fn field_names_and_shapes() {
        let (s, m) = crossing();
        let pool = TaskPool::new(1);
        let ctx = AggregateContext::new(&pool, &s, &m).unwrap();
        let out = compute(FeatureKind::ContactDirection, &ctx, "dir").unwrap();
        assert_eq!(out.face.name(), "face_dir");
        assert_eq!(out.face.owner(), FieldOwner::Face);
        assert_eq!(out.face.dimension(), 3);
        assert_eq!(out.vertex.name(), "vertex_dir");
        assert_eq!(out.vertex.owner(), FieldOwner::Vertex);
        assert_eq!(out.vertex.datatype(), DataType::Float);
        assert_eq!(out.vertex.data().len(), 9);
    }

    #[test]
    fn attach_is_all_or_nothing() {
        let (mut s, m) = crossing();
        s.create_field("vertex_n", FieldOwner::Vertex, DataType::Float, 1)
            .unwrap();
        let pool = TaskPool::new(1);
        let out = {
            let ctx = AggregateContext::new(&pool, &s, &m).unwrap();
            compute(FeatureKind::StreamlineCount, &ctx, "n").unwrap()
        };
        let err = out.attach(&mut s).unwrap_err();
        assert_eq!(
            err,
            FieldError::DuplicateName {
                name: "vertex_n".into()
            }
        );
        assert!(!s.fields().contains("face_n"));
    }

    #[test]
    fn mismatched_mapping_is_rejected() {
        let s = single_triangle();
        let m = tractsurf_engine::Mapping::empty(5);
        let pool = TaskPool::new(1);
        assert_eq!(
            AggregateContext::new(&pool, &s, &m).unwrap_err(),
            AggregateError::MappingMismatch {
                mapping_faces: 5,
                surface_faces: 1
            }
        );
    }
}
