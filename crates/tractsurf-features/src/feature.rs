//! The [`Feature`] trait and the closed set of [`FeatureKind`]s.

use std::fmt;
use std::str::FromStr;

use tractsurf_core::{DataType, FieldData, TaskError};

use crate::angle::ContactAngle;
use crate::context::AggregateContext;
use crate::count::StreamlineCount;
use crate::density::StreamlineDensity;
use crate::direction::ContactDirection;
use crate::error::AggregateError;

/// A per-face reduction followed by a per-vertex propagation.
///
/// # Contract
///
/// - [`reduce_faces`](Feature::reduce_faces) returns exactly
///   `face_count × dimension` values of type
///   [`face_datatype`](Feature::face_datatype); a face without contacts
///   gets 0 in every component.
/// - [`propagate_vertices`](Feature::propagate_vertices) receives the
///   finished face values and returns `vertex_count × dimension` floats.
///   The caller only starts it once the face pass has completed.
/// - Both are deterministic and write only their own output slots.
///
/// This trait is object-safe; [`FeatureKind::feature`] hands out
/// `&'static dyn Feature`.
pub trait Feature: Send + Sync {
    /// Which feature this is.
    fn kind(&self) -> FeatureKind;

    /// Components per element: 1 for scalars, 3 for vectors.
    fn dimension(&self) -> usize {
        1
    }

    /// Datatype of the face field. Vertex fields are always float.
    fn face_datatype(&self) -> DataType {
        DataType::Float
    }

    /// Compute the face values.
    fn reduce_faces(&self, ctx: &AggregateContext<'_>) -> Result<FieldData, TaskError>;

    /// Compute the vertex values from finished face values.
    fn propagate_vertices(
        &self,
        ctx: &AggregateContext<'_>,
        faces: &FieldData,
    ) -> Result<Vec<f32>, TaskError>;
}

/// The four built-in features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Contacts per unit area.
    StreamlineDensity,
    /// Number of contacts.
    StreamlineCount,
    /// Mean angle between segment and face normal.
    ContactAngle,
    /// Mean absolute segment direction per unit area.
    ContactDirection,
}

impl FeatureKind {
    /// All features, in token order.
    pub const ALL: [FeatureKind; 4] = [
        Self::StreamlineDensity,
        Self::StreamlineCount,
        Self::ContactAngle,
        Self::ContactDirection,
    ];

    /// The token used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StreamlineDensity => "streamlineDensity",
            Self::StreamlineCount => "streamlineCount",
            Self::ContactAngle => "contactAngle",
            Self::ContactDirection => "contactDirection",
        }
    }

    /// The implementation of this feature.
    pub fn feature(self) -> &'static dyn Feature {
        match self {
            Self::StreamlineDensity => &StreamlineDensity,
            Self::StreamlineCount => &StreamlineCount,
            Self::ContactAngle => &ContactAngle,
            Self::ContactDirection => &ContactDirection,
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| AggregateError::UnknownFeature {
                token: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        for kind in FeatureKind::ALL {
            assert_eq!(kind.as_str().parse::<FeatureKind>().unwrap(), kind);
            assert_eq!(kind.feature().kind(), kind);
        }
    }

    #[test]
    fn unknown_token_lists_options() {
        let err = "invalid".parse::<FeatureKind>().unwrap_err();
        let msg = err.to_string();
        for kind in FeatureKind::ALL {
            assert!(msg.contains(kind.as_str()));
        }
    }

    #[test]
    fn tokens_are_case_sensitive() {
        assert!("StreamlineDensity".parse::<FeatureKind>().is_err());
    }

    #[test]
    fn shapes() {
        assert_eq!(FeatureKind::ContactDirection.feature().dimension(), 3);
        assert_eq!(FeatureKind::StreamlineCount.feature().face_datatype(), DataType::Int);
        assert_eq!(FeatureKind::ContactAngle.feature().face_datatype(), DataType::Float);
    }
}
