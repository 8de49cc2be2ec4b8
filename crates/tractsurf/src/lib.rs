//! tractsurf: streamline-to-surface mapping and per-element features.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all tractsurf sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use tractsurf::prelude::*;
//!
//! // One triangle of area 2 in the z = 0 plane.
//! let surface = Surface::new(
//!     vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
//!     vec![[0, 1, 2]],
//! )
//! .unwrap();
//! // One streamline crossing it along +z.
//! let tracts = Tractogram::from_streamlines([[[0.5, 0.5, -1.0], [0.5, 0.5, 1.0]]]);
//!
//! let pool = TaskPool::new(2);
//! let mapping = Mapper::default().map(&pool, &tracts, &surface).unwrap();
//! assert_eq!(mapping.total_contacts(), 1);
//!
//! let ctx = AggregateContext::new(&pool, &surface, &mapping).unwrap();
//! let fields = compute(FeatureKind::StreamlineDensity, &ctx, "density").unwrap();
//! assert_eq!(fields.face.name(), "face_density");
//! assert_eq!(fields.face.floats().unwrap(), &[0.5]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tractsurf-core` | IDs, vector math, fields, core traits |
//! | [`space`] | `tractsurf-space` | Surfaces, tractograms, derived geometry |
//! | [`engine`] | `tractsurf-engine` | Run configuration, task pool, mapper |
//! | [`features`] | `tractsurf-features` | The four features and aggregation |
//! | [`io`] | `tractsurf-io` | VTK and TCK files |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, vector math and the field model (`tractsurf-core`).
pub use tractsurf_core as types;

/// Surfaces, tractograms and derived geometry (`tractsurf-space`).
///
/// [`space::Surface::geometry`] computes normals, areas and the face
/// neighbourhoods once and caches them.
pub use tractsurf_space as space;

/// Run configuration, the task pool and the mapper (`tractsurf-engine`).
pub use tractsurf_engine as engine;

/// Feature definitions and aggregation (`tractsurf-features`).
pub use tractsurf_features as features;

/// Surface and tractogram files (`tractsurf-io`).
pub use tractsurf_io as io;

/// Common imports for typical tractsurf usage.
pub mod prelude {
    // Core
    pub use tractsurf_core::{
        DataType, FaceId, Field, FieldData, FieldHost, FieldOwner, Point3, StreamlineId,
    };

    // Geometry containers
    pub use tractsurf_space::{Surface, SurfaceGeometry, Tractogram};

    // Engine
    pub use tractsurf_engine::{Contact, Mapper, MapperConfig, Mapping, RunConfig, TaskPool, Verbosity};

    // Features
    pub use tractsurf_features::{compute, AggregateContext, FeatureFields, FeatureKind};

    // Files
    pub use tractsurf_io::{read_surface, read_tractogram, write_surface, write_tractogram};
}
