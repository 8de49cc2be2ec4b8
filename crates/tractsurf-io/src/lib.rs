//! File formats for tractsurf.
//!
//! - [`vtk`]: legacy VTK binary polydata, for both surfaces
//!   (`POLYGONS`) and tractograms (`LINES`), including point and cell
//!   field arrays.
//! - [`tck`]: MRtrix track files (streamlines only).
//!
//! The path-level entry points ([`read_tractogram`], [`write_tractogram`],
//! [`read_surface`], [`write_surface`]) pick the codec from the file
//! extension. Writes go to a sibling temporary file which is renamed
//! over the target once complete.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod format;
pub mod tck;
pub mod vtk;

pub use error::FormatError;
pub use format::{read_surface, read_tractogram, write_surface, write_tractogram, Format};
