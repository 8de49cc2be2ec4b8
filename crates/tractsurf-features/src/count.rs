//! Streamline count.

use tractsurf_core::{DataType, FieldData, TaskError};

use crate::context::AggregateContext;
use crate::feature::{Feature, FeatureKind};
use crate::passes;

/// Face: the number of contacts, as an integer.
/// Vertex: the mean face count over incident faces.
#[derive(Clone, Copy, Debug, Default)]
pub struct StreamlineCount;

impl Feature for StreamlineCount {
    fn kind(&self) -> FeatureKind {
        FeatureKind::StreamlineCount
    }

    fn face_datatype(&self) -> DataType {
        DataType::Int
    }

    fn reduce_faces(&self, ctx: &AggregateContext<'_>) -> Result<FieldData, TaskError> {
        let label = "count: faces";
        let mut values = vec![0i32; ctx.face_count()];
        ctx.pool().run_into(label, &mut values, |f, slot| {
            *slot = i32::try_from(ctx.contact_count(f))
                .map_err(|_| TaskError::failed(label, f, "contact count overflows i32"))?;
            Ok(())
        })?;
        Ok(FieldData::Int(values))
    }

    fn propagate_vertices(
        &self,
        ctx: &AggregateContext<'_>,
        faces: &FieldData,
    ) -> Result<Vec<f32>, TaskError> {
        let label = "count: vertices";
        let counts = faces
            .as_int()
            .ok_or_else(|| TaskError::failed(label, 0, "face values are not int"))?;
        passes::propagate(ctx, label, |f| ([f64::from(counts[f])], 1.0))
    }
}
