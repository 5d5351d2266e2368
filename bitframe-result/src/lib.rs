//! Error types and result definitions for the bitframe dataframe engine.
//!
//! This crate provides a unified error type ([`Error`]) and result type alias
//! ([`Result<T>`]) used throughout the bitframe crates. All operations that can
//! fail return `Result<T>` and propagate with the `?` operator; at the API
//! boundary the variants carry enough structure for callers to distinguish
//! "reject and retry" conditions (schema mismatches, bad arguments) from
//! fatal ones (unsupported column types, internal invariant violations).

#![forbid(unsafe_code)]

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
