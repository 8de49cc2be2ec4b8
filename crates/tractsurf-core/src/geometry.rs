//! Point and vector math on `[f32; 3]` triples.
//!
//! Points and vectors share the same representation: a plain value type
//! with no identity. All functions are pure and allocation-free.

/// A 3-component point or vector.
pub type Point3 = [f32; 3];

/// The zero vector.
pub const ZERO: Point3 = [0.0; 3];

/// Component-wise `a + b`.
#[inline]
pub fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Component-wise `a - b`.
#[inline]
pub fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Scale every component of `a` by `s`.
#[inline]
pub fn scale(a: Point3, s: f32) -> Point3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

/// Dot product.
#[inline]
pub fn dot(a: Point3, b: Point3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product `a × b`.
#[inline]
pub fn cross(a: Point3, b: Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean length.
#[inline]
pub fn norm(a: Point3) -> f32 {
    dot(a, a).sqrt()
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point3, b: Point3) -> f32 {
    norm(sub(a, b))
}

/// Unit vector in the direction of `a`, or `None` for a zero (or
/// non-finite) vector.
pub fn normalize(a: Point3) -> Option<Point3> {
    let n = norm(a);
    if n > 0.0 && n.is_finite() {
        Some(scale(a, 1.0 / n))
    } else {
        None
    }
}

/// Angle in radians between two vectors, in `[0, π]`.
///
/// Returns 0 if either vector has zero length.
pub fn angle(a: Point3, b: Point3) -> f32 {
    match (normalize(a), normalize(b)) {
        (Some(ua), Some(ub)) => dot(ua, ub).clamp(-1.0, 1.0).acos(),
        _ => 0.0,
    }
}

/// Component-wise absolute value.
#[inline]
pub fn abs(a: Point3) -> Point3 {
    [a[0].abs(), a[1].abs(), a[2].abs()]
}

/// Linear interpolation `a + t (b - a)`.
#[inline]
pub fn lerp(a: Point3, b: Point3, t: f32) -> Point3 {
    add(a, scale(sub(b, a), t))
}

/// Component-wise minimum.
#[inline]
pub fn min(a: Point3, b: Point3) -> Point3 {
    [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])]
}

/// Component-wise maximum.
#[inline]
pub fn max(a: Point3, b: Point3) -> Point3 {
    [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])]
}

/// Axis-aligned bounding box of a point set as `(min, max)`.
///
/// Returns `None` for an empty set.
pub fn bounding_box<'a, I>(points: I) -> Option<(Point3, Point3)>
where
    I: IntoIterator<Item = &'a Point3>,
{
    let mut iter = points.into_iter();
    let first = *iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), p| (min(lo, *p), max(hi, *p))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn cross_of_axes() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn normalize_zero_is_none() {
        assert!(normalize(ZERO).is_none());
        let u = normalize([0.0, 3.0, 4.0]).unwrap();
        assert!((u[1] - 0.6).abs() < 1e-6 && (u[2] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn angle_limits() {
        assert_eq!(angle([1.0, 0.0, 0.0], [2.0, 0.0, 0.0]), 0.0);
        assert!((angle([1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]) - PI).abs() < 1e-6);
        assert!((angle([1.0, 0.0, 0.0], [0.0, 0.0, 5.0]) - PI / 2.0).abs() < 1e-6);
        assert_eq!(angle(ZERO, [1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn bounding_box_of_points() {
        let pts = [[1.0, -2.0, 3.0], [-1.0, 4.0, 0.5], [0.0, 0.0, 0.0]];
        let (lo, hi) = bounding_box(pts.iter()).unwrap();
        assert_eq!(lo, [-1.0, -2.0, 0.0]);
        assert_eq!(hi, [1.0, 4.0, 3.0]);
        assert!(bounding_box(std::iter::empty::<&Point3>()).is_none());
    }

    fn arb_vec() -> impl Strategy<Value = Point3> {
        prop::array::uniform3(-100.0f32..100.0)
    }

    proptest! {
        #[test]
        fn cross_is_orthogonal(a in arb_vec(), b in arb_vec()) {
            let c = cross(a, b);
            let tol = 1e-2 * (norm(a) * norm(b)).max(1.0) * (norm(a) + norm(b)).max(1.0);
            prop_assert!(dot(c, a).abs() <= tol);
            prop_assert!(dot(c, b).abs() <= tol);
        }

        #[test]
        fn angle_in_range(a in arb_vec(), b in arb_vec()) {
            let t = angle(a, b);
            prop_assert!((0.0..=PI).contains(&t));
        }

        #[test]
        fn normalized_has_unit_length(a in arb_vec()) {
            if let Some(u) = normalize(a) {
                prop_assert!((norm(u) - 1.0).abs() < 1e-4);
            }
        }
    }
}
