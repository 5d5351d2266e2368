//! Expression-language surface the core depends on.
//!
//! The interpreter itself is an external collaborator: the core only needs an
//! opaque [`Program`] handle, the [`Evaluator`] contract to run one, and a
//! closed runtime [`Value`] model with the associative [`CombineOp`]s the
//! reduce phase merges partial results with.

#![forbid(unsafe_code)]

pub mod program;
pub mod value;

pub use program::{Evaluator, Program};
pub use value::{CombineOp, Value};
