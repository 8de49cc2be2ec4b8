//! Error type for feature aggregation.

use std::error::Error;
use std::fmt;

use tractsurf_core::{FieldError, TaskError};

/// Errors from [`compute`](crate::compute) and feature selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AggregateError {
    /// A face or vertex pass failed.
    Task(TaskError),
    /// The result fields could not be built or attached.
    Field(FieldError),
    /// The mapping was computed for a surface with a different face count.
    MappingMismatch {
        /// Faces covered by the mapping.
        mapping_faces: usize,
        /// Faces on the surface.
        surface_faces: usize,
    },
    /// The feature token is not one of the four known features.
    UnknownFeature {
        /// The offending token.
        token: String,
    },
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(e) => write!(f, "aggregation failed: {e}"),
            Self::Field(e) => write!(f, "feature field: {e}"),
            Self::MappingMismatch {
                mapping_faces,
                surface_faces,
            } => write!(
                f,
                "mapping covers {mapping_faces} faces but the surface has {surface_faces}"
            ),
            Self::UnknownFeature { token } => write!(
                f,
                "unknown feature \"{token}\". Feature can be \"streamlineDensity\", \
                 \"streamlineCount\", \"contactAngle\" and \"contactDirection\""
            ),
        }
    }
}

impl Error for AggregateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Task(e) => Some(e),
            Self::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TaskError> for AggregateError {
    fn from(e: TaskError) -> Self {
        Self::Task(e)
    }
}

impl From<FieldError> for AggregateError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}
