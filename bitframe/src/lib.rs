//! bitframe: sharded columnar dataframe storage with distributed apply.
//!
//! This crate is the entrypoint for the dataframe extension of the bitframe
//! analytic database. It re-exports the user-facing API from the underlying
//! `bitframe-*` crates.
//!
//! # Architecture
//!
//! The workspace is organized as layered crates:
//!
//! - **Storage** (`bitframe-shard`): per-shard columnar tables in one
//!   parquet file each, ingested through changeset merges and committed via
//!   temp-file-plus-rename. One writer per shard, enforced by a lock
//!   registry; readers only ever observe committed files.
//! - **Data model** (`bitframe-dataframe`, `bitframe-types`): chunked
//!   columns with row-to-chunk resolution, a closed `{Int64, Float64}`
//!   column type set and owned staging buffers.
//! - **Execution** (`bitframe-executor`, `bitframe-expr`): an expression
//!   program is mapped over every shard's (filtered) table, partial results
//!   merge through an associative combine under a mutex, and the initiating
//!   node optionally finalizes the combined value.
//!
//! The expression interpreter itself, the bitmap index producing row
//! filters, and node-to-node transport are external collaborators behind
//! the [`Evaluator`] and [`RowFilterSource`] traits.
//!
//! # Quick start
//!
//! ```no_run
//! use bitframe::{
//!     CancelToken, ChangesetRequest, ColumnSpec, ColumnType, ColumnValues,
//!     DataframeStore, TableSchema,
//! };
//!
//! let store = DataframeStore::new("/var/lib/bitframe/dataframes");
//! let schema = TableSchema::new(vec![ColumnSpec::new("amount", ColumnType::Int64)]);
//! let changeset = ChangesetRequest::new(
//!     schema,
//!     vec![0, 1],
//!     vec![ColumnValues::Int64(vec![10, 20])],
//! );
//! store
//!     .apply_changeset("orders", 0, &changeset, &CancelToken::new())
//!     .unwrap();
//! ```

#![forbid(unsafe_code)]

pub use bitframe_result::{Error, Result};

pub use bitframe_types::{
    CancelToken, ColumnSpec, ColumnType, ColumnValues, RowId, ShardId, TableSchema,
};

pub use bitframe_dataframe::{ChunkResolver, DataFrame, IndexResolver, RowResolver};

pub use bitframe_expr::{CombineOp, Evaluator, Program, Value};

pub use bitframe_shard::{
    dataframe_schema, ChangesetRequest, DataframeStore, ShardConfig, ShardFile, ShardLockRegistry,
};

pub use bitframe_executor::{
    ApplyExecutor, ApplyRequest, MapReduceEngine, Reduction, RowFilterSource,
};
