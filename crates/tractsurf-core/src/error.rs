//! Error types shared across the tractsurf workspace.
//!
//! [`FieldError`] covers the field model (creation, lookup, import);
//! [`TaskError`] is what a parallel worker reports back through the
//! task pool.

use std::error::Error;
use std::fmt;

use crate::field::{DataType, FieldDomain, FieldOwner};

/// Errors from field creation, attachment, and import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// A field with this name already exists in the container.
    DuplicateName {
        /// The colliding name.
        name: String,
    },
    /// The owner has zero elements, so the field would be empty.
    EmptyOwner {
        /// Name of the rejected field.
        name: String,
        /// The owner with zero cardinality.
        owner: FieldOwner,
    },
    /// Fields must have at least one component per element.
    ZeroDimension {
        /// Name of the rejected field.
        name: String,
    },
    /// The owner does not belong to the container's domain
    /// (e.g. a `VERTEX` field on a tractogram).
    OwnerMismatch {
        /// Name of the rejected field.
        name: String,
        /// The requested owner.
        owner: FieldOwner,
        /// The domain of the container.
        domain: FieldDomain,
    },
    /// The payload length does not equal `cardinality × dimension`.
    SizeMismatch {
        /// Name of the rejected field.
        name: String,
        /// Expected number of elements (or bytes, for raw imports).
        expected: usize,
        /// Number found.
        found: usize,
    },
    /// The field exists but holds a different datatype than requested.
    DataTypeMismatch {
        /// Name of the field.
        name: String,
        /// The datatype that was requested.
        expected: DataType,
        /// The datatype actually stored.
        found: DataType,
    },
    /// An owner token was not one of the recognized names.
    UnknownOwner {
        /// The offending token.
        token: String,
    },
    /// A datatype token was not `int` or `float`.
    UnknownDataType {
        /// The offending token.
        token: String,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => write!(f, "field '{name}' already exists"),
            Self::EmptyOwner { name, owner } => {
                write!(f, "field '{name}': owner {owner} has no elements")
            }
            Self::ZeroDimension { name } => {
                write!(f, "field '{name}': dimension must be at least 1")
            }
            Self::OwnerMismatch {
                name,
                owner,
                domain,
            } => write!(f, "field '{name}': owner {owner} is not valid on a {domain}"),
            Self::SizeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "field '{name}': expected {expected} elements, found {found}"
            ),
            Self::DataTypeMismatch {
                name,
                expected,
                found,
            } => write!(f, "field '{name}': expected {expected} data, found {found}"),
            Self::UnknownOwner { token } => write!(f, "unknown field owner \"{token}\""),
            Self::UnknownDataType { token } => write!(
                f,
                "unknown field datatype \"{token}\" (expected \"float\" or \"int\")"
            ),
        }
    }
}

impl Error for FieldError {}

/// Errors reported by a worker running inside the task pool.
///
/// The first error aborts the whole run; the caller receives it and
/// must not consume any partial output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskError {
    /// A worker failed while processing one index.
    Failed {
        /// Label of the stage that was running.
        label: String,
        /// Index whose worker failed.
        index: usize,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The output buffer length is not a multiple of the slot stride.
    InvalidStride {
        /// Label of the stage that was running.
        label: String,
        /// Length of the output buffer.
        len: usize,
        /// Requested slot stride.
        stride: usize,
    },
}

impl TaskError {
    /// Convenience constructor for [`TaskError::Failed`].
    pub fn failed(label: impl Into<String>, index: usize, reason: impl Into<String>) -> Self {
        Self::Failed {
            label: label.into(),
            index,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed {
                label,
                index,
                reason,
            } => write!(f, "{label}: task {index} failed: {reason}"),
            Self::InvalidStride { label, len, stride } => write!(
                f,
                "{label}: output length {len} is not a multiple of stride {stride}"
            ),
        }
    }
}

impl Error for TaskError {}
