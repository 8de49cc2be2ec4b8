//! Strongly-typed element identifiers.

use std::fmt;

/// Identifies a streamline by its index within a tractogram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamlineId(pub u32);

impl fmt::Display for StreamlineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StreamlineId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a triangular face by its index within a surface mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

impl FaceId {
    /// The face index as a `usize`, for slice indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FaceId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
