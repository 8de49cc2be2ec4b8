//! Core types and traits for tractsurf.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the workspace:
//! element IDs, point/vector math, the typed [`Field`] model with its
//! [`FieldCollection`] container, error types, and the [`FieldHost`] trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod geometry;
pub mod id;
pub mod traits;

pub use error::{FieldError, TaskError};
pub use field::{DataType, Field, FieldCollection, FieldData, FieldDomain, FieldOwner};
pub use geometry::Point3;
pub use id::{FaceId, StreamlineId};
pub use traits::FieldHost;
