use std::io;

use thiserror::Error;

/// Unified error type for all bitframe operations.
///
/// Errors propagate upward through the call stack using Rust's `?` operator.
/// Internal code matches on specific variants for fine-grained handling; the
/// serving layer converts them to user-visible query/ingest failures.
///
/// `Error` is `Send + Sync` so map-phase workers can surface failures across
/// thread boundaries.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during shard file operations (open, write, rename).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrow library error during columnar data operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet codec error while reading or writing a shard file.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// An incoming changeset's schema differs structurally from the schema
    /// already committed for the shard. The changeset is rejected before any
    /// mutation occurs.
    #[error("dataframe schema mismatch: expected [{expected}], got [{found}]")]
    SchemaMismatch { expected: String, found: String },

    /// A column type outside the supported closed set was encountered at a
    /// deserialization boundary. The operation is aborted; values are never
    /// silently coerced.
    #[error("unsupported column type: {0}")]
    UnsupportedType(String),

    /// An expected shard file is absent. Read paths treat the missing file as
    /// an empty result; this variant exists for callers that require data.
    #[error("no dataframe data")]
    NoData,

    /// A map-phase partial result's runtime type does not match any case the
    /// reduction can combine.
    #[error("reduction type error: {0}")]
    ReductionType(String),

    /// Finalize was invoked but no partial result was ever accumulated.
    /// This is an explicit failure, never a default value.
    #[error("reduction produced no result")]
    NoResult,

    /// The operation observed a cancellation signal or missed its deadline.
    #[error("operation canceled")]
    Canceled,

    /// Invalid user input or API parameter, e.g. a changeset whose row ids
    /// are not in non-decreasing order.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Internal error indicating a bug or violated invariant.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Build a [`Error::SchemaMismatch`] from the two schemas' display forms.
    #[inline]
    pub fn schema_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::SchemaMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Build a [`Error::ReductionType`] from any displayable description.
    #[inline]
    pub fn reduction_type<D: std::fmt::Display>(desc: D) -> Self {
        Error::ReductionType(desc.to_string())
    }
}
