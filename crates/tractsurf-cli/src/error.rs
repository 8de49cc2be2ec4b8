//! Boundary error type for the command pipelines.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use tractsurf_core::{FieldError, TaskError};
use tractsurf_engine::{ConfigError, TimeLimitExceeded};
use tractsurf_features::AggregateError;
use tractsurf_io::FormatError;

/// Why a command stopped.
///
/// `Validation` and `Conflict` are detected before anything is written.
/// Every variant maps to exit status 1.
#[derive(Debug)]
pub enum CommandError {
    /// A bad argument: unknown token, unusable path, invalid name.
    Validation {
        /// User-facing explanation.
        message: String,
    },
    /// The command would overwrite something and `--force` was not given.
    Conflict {
        /// User-facing explanation.
        message: String,
    },
    /// A file could not be read.
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The wall-clock budget ran out between stages.
    TimeLimitExceeded(TimeLimitExceeded),
    /// Invalid run configuration.
    Config(ConfigError),
    /// Reading or writing a surface or tractogram failed.
    Format(FormatError),
    /// A field could not be created or attached.
    Field(FieldError),
    /// The mapping stage failed.
    Task(TaskError),
    /// The aggregation stage failed.
    Aggregate(AggregateError),
}

impl CommandError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { message } | Self::Conflict { message } => f.write_str(message),
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::TimeLimitExceeded(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::Format(e) => write!(f, "{e}"),
            Self::Field(e) => write!(f, "{e}"),
            Self::Task(e) => write!(f, "{e}"),
            Self::Aggregate(e) => write!(f, "{e}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::TimeLimitExceeded(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::Field(e) => Some(e),
            Self::Task(e) => Some(e),
            Self::Aggregate(e) => Some(e),
            Self::Validation { .. } | Self::Conflict { .. } => None,
        }
    }
}

impl From<TimeLimitExceeded> for CommandError {
    fn from(e: TimeLimitExceeded) -> Self {
        Self::TimeLimitExceeded(e)
    }
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<FormatError> for CommandError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<FieldError> for CommandError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<TaskError> for CommandError {
    fn from(e: TaskError) -> Self {
        Self::Task(e)
    }
}

impl From<AggregateError> for CommandError {
    fn from(e: AggregateError) -> Self {
        Self::Aggregate(e)
    }
}
