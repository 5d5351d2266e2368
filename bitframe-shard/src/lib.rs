//! Per-shard columnar storage engine.
//!
//! Each shard's dataframe lives in a single Parquet file. A write reads the
//! committed table fully into memory, merges the changeset into an owned
//! staging copy (in-place updates for existing rows, one appended chunk for
//! new rows) and commits by writing a temp file and atomically renaming it
//! over the canonical path. Readers are never blocked: they only ever see a
//! fully committed file.
//!
//! Writer exclusion is per shard via [`ShardLockRegistry`]; the
//! [`DataframeStore`] front door ties paths, locks and the merge together.

#![forbid(unsafe_code)]

pub mod changeset;
pub mod locks;
pub mod shard_file;
pub mod store;

pub use changeset::ChangesetRequest;
pub use locks::ShardLockRegistry;
pub use shard_file::{dataframe_schema, ShardConfig, ShardFile};
pub use store::DataframeStore;
