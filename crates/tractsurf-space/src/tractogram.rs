//! Streamline container with point and streamline fields.

use tractsurf_core::geometry::{self, Point3};
use tractsurf_core::{FieldCollection, FieldDomain, FieldHost, FieldOwner, StreamlineId};

use crate::error::SpaceError;

/// An ordered set of streamlines.
///
/// Points of all streamlines live in one flat buffer; streamline `i`
/// spans `points[offsets[i]..offsets[i + 1]]`. `offsets` always has
/// `streamline_count() + 1` entries starting at 0 and ending at
/// `point_count()`.
#[derive(Clone, Debug)]
pub struct Tractogram {
    points: Vec<Point3>,
    offsets: Vec<usize>,
    fields: FieldCollection,
}

impl Default for Tractogram {
    fn default() -> Self {
        Self::empty()
    }
}

impl Tractogram {
    /// A tractogram with no streamlines.
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            offsets: vec![0],
            fields: FieldCollection::new(FieldDomain::Tractogram),
        }
    }

    /// Build from a sequence of point lists, one per streamline.
    pub fn from_streamlines<I, S>(streamlines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[Point3]>,
    {
        let mut t = Self::empty();
        for s in streamlines {
            t.points.extend_from_slice(s.as_ref());
            t.offsets.push(t.points.len());
        }
        t
    }

    /// Build from a flat point buffer and streamline offsets.
    ///
    /// `offsets` must start at 0, be non-decreasing and end at
    /// `points.len()`.
    pub fn from_parts(points: Vec<Point3>, offsets: Vec<usize>) -> Result<Self, SpaceError> {
        if offsets.first() != Some(&0) {
            return Err(SpaceError::InvalidOffsets {
                reason: "offsets must start at 0".to_string(),
            });
        }
        if offsets.windows(2).any(|w| w[1] < w[0]) {
            return Err(SpaceError::InvalidOffsets {
                reason: "offsets must be non-decreasing".to_string(),
            });
        }
        if offsets.last() != Some(&points.len()) {
            return Err(SpaceError::InvalidOffsets {
                reason: format!(
                    "last offset must equal the point count {}",
                    points.len()
                ),
            });
        }
        Ok(Self {
            points,
            offsets,
            fields: FieldCollection::new(FieldDomain::Tractogram),
        })
    }

    /// Number of streamlines.
    pub fn streamline_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of points across all streamlines.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// True if there are no streamlines.
    pub fn is_empty(&self) -> bool {
        self.streamline_count() == 0
    }

    /// Points of one streamline.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn streamline(&self, id: StreamlineId) -> &[Point3] {
        let i = id.0 as usize;
        &self.points[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Streamlines in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[Point3]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.points[w[0]..w[1]])
    }

    /// The flat point buffer.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Streamline offsets into [`points`](Self::points).
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Axis-aligned bounds of all points, or `None` if there are none.
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        geometry::bounding_box(&self.points)
    }
}

impl FieldHost for Tractogram {
    fn cardinality(&self, owner: FieldOwner) -> Option<usize> {
        match owner {
            FieldOwner::Point => Some(self.point_count()),
            FieldOwner::Streamline => Some(self.streamline_count()),
            FieldOwner::Vertex | FieldOwner::Face => None,
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
    use proptest::prelude::*;
    use tractsurf_core::{DataType, FieldError};

    #[test]
    fn empty_has_no_streamlines() {
        let t = Tractogram::empty();
        assert_eq!(t.streamline_count(), 0);
        assert_eq!(t.point_count(), 0);
        assert!(t.is_empty());
        assert_eq!(t.iter().count(), 0);
        assert!(t.bounding_box().is_none());
    }

    #[test]
    fn streamlines_keep_their_points() {
        let t = Tractogram::from_streamlines([
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            vec![],
            vec![[2.0, 2.0, 2.0]],
        ]);
        assert_eq!(t.streamline_count(), 3);
        assert_eq!(t.point_count(), 3);
        assert_eq!(t.offsets(), &[0, 2, 2, 3]);
        assert!(t.streamline(StreamlineId(1)).is_empty());
        assert_eq!(t.streamline(StreamlineId(2)), &[[2.0, 2.0, 2.0]]);
    }

    #[test]
    fn from_parts_rejects_bad_offsets() {
        let pts = vec![[0.0; 3]; 4];
        assert!(Tractogram::from_parts(pts.clone(), vec![1, 4]).is_err());
        assert!(Tractogram::from_parts(pts.clone(), vec![0, 3, 2, 4]).is_err());
        assert!(Tractogram::from_parts(pts.clone(), vec![0, 3]).is_err());
        assert!(Tractogram::from_parts(pts.clone(), Vec::new()).is_err());
        let t = Tractogram::from_parts(pts, vec![0, 1, 4]).unwrap();
        assert_eq!(t.streamline_count(), 2);
    }

    #[test]
    fn point_and_streamline_fields() {
        let mut t = Tractogram::from_streamlines([[[0.0; 3]; 3], [[1.0; 3]; 3]]);
        let f = t
            .create_field("fa", FieldOwner::Point, DataType::Float, 1)
            .unwrap();
        assert_eq!(f.cardinality(), 6);
        let f = t
            .create_field("bundle", FieldOwner::Streamline, DataType::Int, 1)
            .unwrap();
        assert_eq!(f.cardinality(), 2);
        let err = t
            .create_field("fa", FieldOwner::Point, DataType::Float, 1)
            .unwrap_err();
        assert!(matches!(err, FieldError::DuplicateName { .. }));
        let err = t
            .create_field("v", FieldOwner::Vertex, DataType::Float, 1)
            .unwrap_err();
        assert!(matches!(err, FieldError::OwnerMismatch { .. }));
    }

    #[test]
    fn empty_tractogram_refuses_fields() {
        let mut t = Tractogram::empty();
        let err = t
            .create_field("x", FieldOwner::Streamline, DataType::Int, 1)
            .unwrap_err();
        assert!(matches!(err, FieldError::EmptyOwner { .. }));
    }

    proptest! {
        #[test]
        fn counts_match_input(lens in proptest::collection::vec(0usize..6, 0..20)) {
            let lines: Vec<Vec<Point3>> = lens
                .iter()
                .map(|&n| (0..n).map(|k| [k as f32, 0.0, 0.0]).collect())
                .collect();
            let t = Tractogram::from_streamlines(&lines);
            prop_assert_eq!(t.streamline_count(), lens.len());
            prop_assert_eq!(t.point_count(), lens.iter().sum::<usize>());
            for (got, want) in t.iter().zip(&lines) {
                prop_assert_eq!(got, want.as_slice());
            }
        }
    }
}
