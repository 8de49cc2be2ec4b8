//! Mean contact direction.

use tractsurf_core::geometry::{self, Point3};
use tractsurf_core::{FieldData, TaskError};

use crate::context::AggregateContext;
use crate::feature::{Feature, FeatureKind};
use crate::passes;

/// Face: `Σ |direction| / area(f)` over the face's contacts (component-wise
/// absolute values), then every face vector is divided by the largest
/// face-vector norm on the surface. Zero-area faces and a zero maximum
/// leave vectors at 0.
///
/// Vertex: area-weighted mean of the incident face vectors.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContactDirection;

impl Feature for ContactDirection {
    fn kind(&self) -> FeatureKind {
        FeatureKind::ContactDirection
    }

    fn dimension(&self) -> usize {
        3
    }

    fn reduce_faces(&self, ctx: &AggregateContext<'_>) -> Result<FieldData, TaskError> {
        let geometry = ctx.geometry();
        let mut values = passes::reduce_faces(ctx, "direction: faces", |f, contacts| {
            let area = geometry.area(f);
            if contacts.is_empty() || area <= 0.0 {
                return geometry::ZERO;
            }
            let sum = contacts
                .iter()
                .fold(geometry::ZERO, |acc, c| geometry::add(acc, geometry::abs(c.direction)));
            geometry::scale(sum, 1.0 / area)
        })?;

        let max = values
            .chunks_exact(3)
            .map(|v| geometry::norm([v[0], v[1], v[2]]))
            .fold(0.0f32, f32::max);
        tracing::debug!(max, "direction normalisation");
        if max > 0.0 {
            ctx.pool()
                .run_strided("direction: normalise", &mut values, 3, |_, v| {
                    for x in v.iter_mut() {
                        *x /= max;
                    }
                    Ok(())
                })?;
        }
        Ok(FieldData::Float(values))
    }

    fn propagate_vertices(
        &self,
        ctx: &AggregateContext<'_>,
        faces: &FieldData,
    ) -> Result<Vec<f32>, TaskError> {
        let label = "direction: vertices";
        let vectors = passes::float_faces(faces, label)?;
        let geometry = ctx.geometry();
        passes::propagate(ctx, label, |f| {
            let area = f64::from(geometry.area(f));
            let v: Point3 = [vectors[3 * f], vectors[3 * f + 1], vectors[3 * f + 2]];
            (v.map(|x| f64::from(x) * area), area)
        })
    }
}
