//! Error types for surface and tractogram construction.

use std::error::Error;
use std::fmt;

use tractsurf_core::FieldError;

/// Errors arising from building a surface or a tractogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// A face references a vertex index that does not exist.
    FaceIndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        vertex: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// Streamline offsets do not partition the point buffer.
    InvalidOffsets {
        /// What went wrong.
        reason: String,
    },
    /// A field operation on the container failed.
    Field(FieldError),
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FaceIndexOutOfRange {
                face,
                vertex,
                vertex_count,
            } => write!(
                f,
                "face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices"
            ),
            Self::InvalidOffsets { reason } => write!(f, "invalid streamline offsets: {reason}"),
            Self::Field(e) => write!(f, "field error: {e}"),
        }
    }
}

impl Error for SpaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FieldError> for SpaceError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}
