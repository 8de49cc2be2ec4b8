//! Error type for file reading and writing.

use std::fmt;
use std::io;
use std::path::PathBuf;

use tractsurf_core::FieldError;
use tractsurf_space::SpaceError;

/// Errors from decoding or encoding a surface or tractogram file.
#[derive(Debug)]
pub enum FormatError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The file extension does not name a known format.
    UnsupportedExtension {
        /// The offending path.
        path: PathBuf,
    },
    /// The format is recognised but this variant of it cannot be handled.
    UnsupportedFormat {
        /// What was found (e.g. `"ASCII VTK"`).
        format: String,
        /// Why it cannot be handled.
        reason: String,
    },
    /// The data could not be decoded (truncated or corrupt).
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A field name cannot be stored in this format.
    InvalidFieldName {
        /// The rejected name.
        name: String,
    },
    /// A decoded field was rejected by its container.
    Field(FieldError),
    /// The decoded geometry was inconsistent.
    Space(SpaceError),
}

impl FormatError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnsupportedExtension { path } => {
                write!(f, "unsupported file extension: {}", path.display())
            }
            Self::UnsupportedFormat { format, reason } => {
                write!(f, "unsupported format {format}: {reason}")
            }
            Self::Malformed { detail } => write!(f, "malformed file: {detail}"),
            Self::InvalidFieldName { name } => {
                write!(f, "field name \"{name}\" cannot be stored (empty or contains whitespace)")
            }
            Self::Field(e) => write!(f, "{e}"),
            Self::Space(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Field(e) => Some(e),
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<FieldError> for FormatError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<SpaceError> for FormatError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}
