//! Shared test fixtures: a minimal stand-in for the external expression
//! interpreter.

use std::sync::atomic::{AtomicUsize, Ordering};

use arrow::array::Int64Array;

use bitframe_dataframe::{DataFrame, RowResolver};
use bitframe_expr::{Evaluator, Program, Value};
use bitframe_result::{Error, Result};

/// Evaluates `sum <column>` map programs and `_` / `negate` finalize
/// programs, counting map invocations so tests can assert short-circuits.
#[derive(Default)]
pub struct SumEvaluator {
    pub map_calls: AtomicUsize,
}

impl SumEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map_call_count(&self) -> usize {
        self.map_calls.load(Ordering::SeqCst)
    }
}

impl Evaluator for SumEvaluator {
    fn evaluate(
        &self,
        program: &Program,
        table: &DataFrame,
        rows: &dyn RowResolver,
    ) -> Result<Value> {
        self.map_calls.fetch_add(1, Ordering::SeqCst);
        let name = program
            .source()
            .strip_prefix("sum ")
            .ok_or_else(|| Error::InvalidArgumentError(format!("unknown program: {program}")))?;
        let col = table
            .schema()
            .fields()
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| Error::InvalidArgumentError(format!("unknown column: {name}")))?;

        let mut total = 0_i64;
        for pos in 0..rows.num_rows() {
            let (chunk, offset) = rows.resolve(pos);
            let array = table
                .column_chunk(col, chunk)
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| Error::InvalidArgumentError(format!("column {name} is not int64")))?;
            total += array.value(offset);
        }
        Ok(Value::Int64(total))
    }

    fn evaluate_value(&self, program: &Program, input: Value) -> Result<Value> {
        match program.source() {
            "_" => Ok(input),
            "negate" => match input {
                Value::Int64(v) => Ok(Value::Int64(-v)),
                Value::Float64(v) => Ok(Value::Float64(-v)),
                other => Err(Error::reduction_type(format!(
                    "cannot negate {}",
                    other.kind()
                ))),
            },
            other => Err(Error::InvalidArgumentError(format!(
                "unknown finalize program: {other}"
            ))),
        }
    }
}
