//! Chunked columnar table model.
//!
//! A [`DataFrame`] is one shard's committed table in memory: an Arrow schema
//! plus an ordered sequence of [`RecordBatch`] chunks. Row ids resolve to a
//! `(chunk, offset)` pair as a pure function of cumulative chunk lengths,
//! which lets the expression evaluator walk either the whole table
//! ([`ChunkResolver`]) or an arbitrary filtered subset ([`IndexResolver`])
//! without materializing a copy of any column.
//!
//! [`RecordBatch`]: arrow::record_batch::RecordBatch

#![forbid(unsafe_code)]

pub mod frame;
pub mod resolver;

pub use frame::DataFrame;
pub use resolver::{ChunkResolver, IndexResolver, RowResolver};
