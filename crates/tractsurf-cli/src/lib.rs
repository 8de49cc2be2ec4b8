//! Command pipelines behind the `tractsurf` binary.
//!
//! Each tool is a plain function taking a request and a [`RunConfig`]:
//!
//! | Tool | Entry point |
//! |------|-------------|
//! | `field-import` | [`run_field_import`] |
//! | `track2surf` | [`run_track2surf`] |
//!
//! Both follow the same shape: validate every argument, load inputs,
//! run the stages with the wall-clock budget checked between them, write
//! the result, then release in-memory fields. Validation and conflict
//! errors are raised before any file is touched.
//!
//! [`RunConfig`]: tractsurf_engine::RunConfig

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod args;
pub mod error;
pub mod import;
pub mod logging;
pub mod track2surf;

use std::path::{Path, PathBuf};

use tractsurf_core::FieldCollection;

pub use args::{Cli, Command, CommonArgs};
pub use error::CommandError;
pub use import::{run_field_import, FieldImportRequest};
pub use track2surf::{run_track2surf, Track2SurfRequest};

/// What a successful command did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The result was written to `path`.
    Written {
        /// The file written.
        path: PathBuf,
    },
    /// There was nothing to do; no file was written.
    NoWork,
}

pub(crate) fn check_readable(path: &Path) -> Result<(), CommandError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CommandError::validation(format!(
            "cannot read {}: no such file",
            path.display()
        )))
    }
}

/// Field names are stored as single tokens.
pub(crate) fn check_field_name(name: &str) -> Result<(), CommandError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(CommandError::validation(format!(
            "invalid field name \"{name}\" (must be non-empty without whitespace)"
        )));
    }
    Ok(())
}

pub(crate) fn release_fields(fields: &mut FieldCollection) {
    for name in fields.names() {
        tracing::debug!(field = name, "releasing field");
    }
    fields.clear();
}
