use std::fmt;

use bitframe_dataframe::{DataFrame, RowResolver};
use bitframe_result::Result;

use crate::value::Value;

/// Opaque source of an expression program.
///
/// The core never inspects program text; it only hands programs to an
/// [`Evaluator`]. One program drives the map phase per shard, an optional
/// second one the finalize step at the initiating node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program(String);

impl Program {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn source(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contract for the external expression interpreter.
///
/// Implementations must be pure with respect to the table view passed in:
/// evaluation may not mutate the frame and may only visit rows the resolver
/// yields.
pub trait Evaluator: Send + Sync {
    /// Map-phase entry: run `program` against one shard's (filtered) table.
    fn evaluate(
        &self,
        program: &Program,
        table: &DataFrame,
        rows: &dyn RowResolver,
    ) -> Result<Value>;

    /// Finalize entry: run `program` once against the fully combined
    /// accumulator.
    fn evaluate_value(&self, program: &Program, input: Value) -> Result<Value>;
}
