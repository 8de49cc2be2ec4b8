//! Shared face and vertex pass drivers.

use tractsurf_core::{FaceId, TaskError};
use tractsurf_engine::Contact;

use crate::context::AggregateContext;

/// Run a face pass producing `D` floats per face from its contacts.
pub(crate) fn reduce_faces<const D: usize, F>(
    ctx: &AggregateContext<'_>,
    label: &str,
    reduce: F,
) -> Result<Vec<f32>, TaskError>
where
    F: Fn(usize, &[Contact]) -> [f32; D] + Sync,
{
    let mut out = vec![0.0f32; ctx.face_count() * D];
    let mapping = ctx.mapping();
    ctx.pool().run_strided(label, &mut out, D, |f, slot| {
        slot.copy_from_slice(&reduce(f, mapping.contacts(FaceId(f as u32))));
        Ok(())
    })?;
    Ok(out)
}

/// Run a vertex pass.
///
/// For every vertex, `term(f)` yields a numerator and a weight for each
/// incident face `f`; the vertex value is `Σ numerator / Σ weight`, or
/// 0 when the weight sum is not positive. Sums are accumulated in `f64`.
pub(crate) fn propagate<const D: usize, F>(
    ctx: &AggregateContext<'_>,
    label: &str,
    term: F,
) -> Result<Vec<f32>, TaskError>
where
    F: Fn(usize) -> ([f64; D], f64) + Sync,
{
    let mut out = vec![0.0f32; ctx.vertex_count() * D];
    let geometry = ctx.geometry();
    ctx.pool().run_strided(label, &mut out, D, |v, slot| {
        let mut numerator = [0.0f64; D];
        let mut weight = 0.0f64;
        for &f in geometry.neighboring_faces(v) {
            let (n, w) = term(f as usize);
            for (acc, x) in numerator.iter_mut().zip(n) {
                *acc += x;
            }
            weight += w;
        }
        if weight > 0.0 {
            for (dst, n) in slot.iter_mut().zip(numerator) {
                *dst = (n / weight) as f32;
            }
        } else {
            slot.fill(0.0);
        }
        Ok(())
    })?;
    Ok(out)
}

/// `numerator / divisor`, or 0 when the divisor is not positive.
pub(crate) fn ratio(numerator: f64, divisor: f64) -> f32 {
    if divisor > 0.0 {
        (numerator / divisor) as f32
    } else {
        0.0
    }
}

/// Float face values, or a task error naming the stage.
pub(crate) fn float_faces<'a>(
    faces: &'a tractsurf_core::FieldData,
    label: &str,
) -> Result<&'a [f32], TaskError> {
    faces
        .as_float()
        .ok_or_else(|| TaskError::failed(label, 0, "face values are not float"))
}
