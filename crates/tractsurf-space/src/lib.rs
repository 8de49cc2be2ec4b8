//! Spatial data structures for tractsurf.
//!
//! - [`Surface`]: a triangle mesh with vertex/face fields and lazily
//!   derived, read-only [`SurfaceGeometry`] (normals, centers, areas,
//!   edge vectors, vertex→face adjacency, and a [`FaceGrid`] index).
//! - [`Tractogram`]: an ordered set of streamlines stored as one flat
//!   point buffer plus offsets, with point/streamline fields.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod grid;
pub mod surface;
pub mod tractogram;

pub use error::SpaceError;
pub use geometry::SurfaceGeometry;
pub use grid::FaceGrid;
pub use surface::Surface;
pub use tractogram::Tractogram;
