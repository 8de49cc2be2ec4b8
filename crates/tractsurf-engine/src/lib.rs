//! Execution layer for tractsurf.
//!
//! - [`RunConfig`]: the per-invocation configuration record (thread
//!   count, verbosity, wall-clock budget), built once at startup and
//!   passed by reference.
//! - [`TaskPool`]: fork-join execution of index-addressed work over a
//!   fixed number of worker threads.
//! - [`Mapper`]: associates every streamline segment with the surface
//!   face it crosses, producing a per-face [`Mapping`] of [`Contact`]s.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod mapper;
pub mod pool;

pub use config::{ConfigError, Deadline, RunConfig, TimeLimitExceeded, Verbosity};
pub use mapper::{Contact, Mapper, MapperConfig, Mapping};
pub use pool::TaskPool;
