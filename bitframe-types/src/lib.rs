//! Core identifiers and data-model types shared across bitframe crates.
//!
//! These types live here so the storage, expression and executor crates can
//! reuse them without depending on each other.

#![forbid(unsafe_code)]

pub mod cancel;
pub mod ids;
pub mod schema;
pub mod values;

pub use cancel::CancelToken;
pub use ids::{RowId, ShardId};
pub use schema::{ColumnSpec, ColumnType, TableSchema};
pub use values::ColumnValues;
