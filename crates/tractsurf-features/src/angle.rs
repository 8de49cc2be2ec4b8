//! Mean contact angle.

use tractsurf_core::{FieldData, TaskError};

use crate::context::AggregateContext;
use crate::feature::{Feature, FeatureKind};
use crate::passes::{self, ratio};

/// Face: mean angle over the face's contacts, 0 without contacts.
/// Vertex: `Σ angle(f)·contacts(f) / Σ contacts(f)` over incident faces.
///
/// Both lie in `[0, π]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContactAngle;

impl Feature for ContactAngle {
    fn kind(&self) -> FeatureKind {
        FeatureKind::ContactAngle
    }

    fn reduce_faces(&self, ctx: &AggregateContext<'_>) -> Result<FieldData, TaskError> {
        let values = passes::reduce_faces(ctx, "angle: faces", |_, contacts| {
            let total: f64 = contacts.iter().map(|c| f64::from(c.angle)).sum();
            [ratio(total, contacts.len() as f64)]
        })?;
        Ok(FieldData::Float(values))
    }

    fn propagate_vertices(
        &self,
        ctx: &AggregateContext<'_>,
        faces: &FieldData,
    ) -> Result<Vec<f32>, TaskError> {
        let label = "angle: vertices";
        let angles = passes::float_faces(faces, label)?;
        passes::propagate(ctx, label, |f| {
            let count = ctx.contact_count(f) as f64;
            ([f64::from(angles[f]) * count], count)
        })
    }
}
