//! Surface features derived from a streamline [`Mapping`](tractsurf_engine::Mapping).
//!
//! Each feature is a face reduction followed by a vertex propagation,
//! both dispatched through the [`TaskPool`](tractsurf_engine::TaskPool):
//!
//! | Feature | Face value | Vertex value |
//! |---|---|---|
//! | [`StreamlineDensity`] | contacts / area | Σ contacts / Σ area |
//! | [`StreamlineCount`] | contacts (int) | mean contacts |
//! | [`ContactAngle`] | mean angle | contact-weighted mean angle |
//! | [`ContactDirection`] | Σ\|direction\| / area, scaled by the largest face norm | area-weighted mean |
//!
//! Vertex values average over the faces incident to the vertex; a
//! vertex with no incident faces, or whose weights sum to zero, gets 0.
//! [`aggregate::compute`] runs one feature and packages the results as
//! `face_<name>` and `vertex_<name>` fields.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod angle;
pub mod context;
pub mod count;
pub mod density;
pub mod direction;
pub mod error;
pub mod feature;
mod passes;

pub use aggregate::{compute, face_field_name, vertex_field_name, FeatureFields};
pub use angle::ContactAngle;
pub use context::AggregateContext;
pub use count::StreamlineCount;
pub use density::StreamlineDensity;
pub use direction::ContactDirection;
pub use error::AggregateError;
pub use feature::{Feature, FeatureKind};
