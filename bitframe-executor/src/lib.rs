//! Distributed execution of expression programs over dataframe shards.
//!
//! A query fans one map call out per shard ([`MapReduceEngine`]), merges the
//! partial results into a single accumulator under a mutex ([`Reduction`])
//! using a caller-supplied associative combine, and runs an optional
//! finishing program over the fully combined value, but only on the node
//! that initiated the query. Non-initiating hops forward the accumulator
//! as-is so multi-level aggregation trees compose.

#![forbid(unsafe_code)]

pub mod apply;
pub mod map_reduce;
pub mod reduce;

pub use apply::{ApplyExecutor, ApplyRequest, RowFilterSource};
pub use map_reduce::MapReduceEngine;
pub use reduce::Reduction;
