//! Streamline density: contacts per unit area.

use tractsurf_core::{FieldData, TaskError};

use crate::context::AggregateContext;
use crate::feature::{Feature, FeatureKind};
use crate::passes::{self, ratio};

/// Face: `contacts(f) / area(f)`.
/// Vertex: `Σ contacts / Σ area` over incident faces.
///
/// Zero-area faces get 0 on the face but still add their contacts to
/// the vertex numerator.
#[derive(Clone, Copy, Debug, Default)]
pub struct StreamlineDensity;

impl Feature for StreamlineDensity {
    fn kind(&self) -> FeatureKind {
        FeatureKind::StreamlineDensity
    }

    fn reduce_faces(&self, ctx: &AggregateContext<'_>) -> Result<FieldData, TaskError> {
        let geometry = ctx.geometry();
        let values = passes::reduce_faces(ctx, "density: faces", |f, contacts| {
            [ratio(contacts.len() as f64, f64::from(geometry.area(f)))]
        })?;
        Ok(FieldData::Float(values))
    }

    fn propagate_vertices(
        &self,
        ctx: &AggregateContext<'_>,
        _faces: &FieldData,
    ) -> Result<Vec<f32>, TaskError> {
        let geometry = ctx.geometry();
        passes::propagate(ctx, "density: vertices", |f| {
            (
                [ctx.contact_count(f) as f64],
                f64::from(geometry.area(f)),
            )
        })
    }
}
