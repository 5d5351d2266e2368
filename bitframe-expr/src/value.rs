//! Runtime values and the associative combines used by the reduce phase.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array};
use arrow::compute;

use bitframe_result::{Error, Result};

/// A map-phase partial result or a fully reduced answer.
///
/// `Empty` is the explicit "this shard contributed nothing" marker (missing
/// shard file, empty row filter). The reduction skips it rather than
/// combining it.
#[derive(Debug, Clone)]
pub enum Value {
    Empty,
    Int64(i64),
    Float64(f64),
    Column(ArrayRef),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Short tag for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::Column(_) => "column",
        }
    }

    /// The Arrow array form of this value; scalars become one-element arrays.
    pub fn to_array(&self) -> Result<ArrayRef> {
        match self {
            Value::Int64(v) => Ok(Arc::new(Int64Array::from(vec![*v])) as ArrayRef),
            Value::Float64(v) => Ok(Arc::new(Float64Array::from(vec![*v])) as ArrayRef),
            Value::Column(a) => Ok(a.clone()),
            Value::Empty => Err(Error::reduction_type("empty value has no array form")),
        }
    }
}

/// Binary combine operations for merging partial results.
///
/// Every operation is associative and commutative over the value shapes it
/// accepts, so merge order never changes the reduced result. Shapes outside
/// an operation's domain fail with [`Error::ReductionType`] instead of being
/// coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineOp {
    /// Concatenate partials into one column vector (the default, matching
    /// the query language's vector concatenation).
    Concat,
    /// Numeric sum of like-typed scalars, or element-wise sum of like-typed
    /// columns of equal length.
    Add,
    /// Minimum of like-typed scalars.
    Min,
    /// Maximum of like-typed scalars.
    Max,
}

impl CombineOp {
    /// Combine two non-empty partial results.
    pub fn apply(&self, a: &Value, b: &Value) -> Result<Value> {
        match self {
            CombineOp::Concat => {
                let left = a.to_array()?;
                let right = b.to_array()?;
                if left.data_type() != right.data_type() {
                    return Err(Error::reduction_type(format!(
                        "cannot concatenate {} with {}",
                        left.data_type(),
                        right.data_type()
                    )));
                }
                Ok(Value::Column(compute::concat(&[
                    left.as_ref(),
                    right.as_ref(),
                ])?))
            }
            CombineOp::Add => match (a, b) {
                (Value::Int64(x), Value::Int64(y)) => Ok(Value::Int64(x + y)),
                (Value::Float64(x), Value::Float64(y)) => Ok(Value::Float64(x + y)),
                (Value::Column(x), Value::Column(y)) => add_columns(x, y),
                (a, b) => Err(Error::reduction_type(format!(
                    "cannot add {} and {}",
                    a.kind(),
                    b.kind()
                ))),
            },
            CombineOp::Min => match (a, b) {
                (Value::Int64(x), Value::Int64(y)) => Ok(Value::Int64(*x.min(y))),
                (Value::Float64(x), Value::Float64(y)) => Ok(Value::Float64(x.min(*y))),
                (a, b) => Err(Error::reduction_type(format!(
                    "cannot take min of {} and {}",
                    a.kind(),
                    b.kind()
                ))),
            },
            CombineOp::Max => match (a, b) {
                (Value::Int64(x), Value::Int64(y)) => Ok(Value::Int64(*x.max(y))),
                (Value::Float64(x), Value::Float64(y)) => Ok(Value::Float64(x.max(*y))),
                (a, b) => Err(Error::reduction_type(format!(
                    "cannot take max of {} and {}",
                    a.kind(),
                    b.kind()
                ))),
            },
        }
    }
}

fn add_columns(x: &ArrayRef, y: &ArrayRef) -> Result<Value> {
    if x.len() != y.len() {
        return Err(Error::reduction_type(format!(
            "cannot add columns of length {} and {}",
            x.len(),
            y.len()
        )));
    }
    if let (Some(xs), Some(ys)) = (
        x.as_any().downcast_ref::<Int64Array>(),
        y.as_any().downcast_ref::<Int64Array>(),
    ) {
        let sums: Vec<i64> = xs
            .values()
            .iter()
            .zip(ys.values().iter())
            .map(|(a, b)| a + b)
            .collect();
        return Ok(Value::Column(Arc::new(Int64Array::from(sums))));
    }
    if let (Some(xs), Some(ys)) = (
        x.as_any().downcast_ref::<Float64Array>(),
        y.as_any().downcast_ref::<Float64Array>(),
    ) {
        let sums: Vec<f64> = xs
            .values()
            .iter()
            .zip(ys.values().iter())
            .map(|(a, b)| a + b)
            .collect();
        return Ok(Value::Column(Arc::new(Float64Array::from(sums))));
    }
    Err(Error::reduction_type(format!(
        "cannot add columns of type {} and {}",
        x.data_type(),
        y.data_type()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_column(values: Vec<i64>) -> Value {
        Value::Column(Arc::new(Int64Array::from(values)))
    }

    #[test]
    fn add_combines_scalars() {
        let out = CombineOp::Add.apply(&Value::Int64(5), &Value::Int64(7)).unwrap();
        assert!(matches!(out, Value::Int64(12)));
    }

    #[test]
    fn add_rejects_mixed_scalar_types() {
        let err = CombineOp::Add
            .apply(&Value::Int64(1), &Value::Float64(2.0))
            .unwrap_err();
        assert!(matches!(err, Error::ReductionType(_)));
    }

    #[test]
    fn add_combines_columns_elementwise() {
        let out = CombineOp::Add
            .apply(&int_column(vec![1, 2]), &int_column(vec![10, 20]))
            .unwrap();
        let Value::Column(col) = out else {
            panic!("expected column");
        };
        let col = col.as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(col.values().as_ref(), &[11, 22]);
    }

    #[test]
    fn concat_joins_columns_and_scalars() {
        let out = CombineOp::Concat
            .apply(&int_column(vec![1, 2]), &Value::Int64(3))
            .unwrap();
        let Value::Column(col) = out else {
            panic!("expected column");
        };
        let col = col.as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(col.values().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn concat_rejects_mixed_element_types() {
        let err = CombineOp::Concat
            .apply(&Value::Int64(1), &Value::Float64(1.0))
            .unwrap_err();
        assert!(matches!(err, Error::ReductionType(_)));
    }

    #[test]
    fn min_max_over_scalars() {
        assert!(matches!(
            CombineOp::Min.apply(&Value::Int64(4), &Value::Int64(9)).unwrap(),
            Value::Int64(4)
        ));
        assert!(matches!(
            CombineOp::Max.apply(&Value::Float64(4.5), &Value::Float64(1.5)).unwrap(),
            Value::Float64(v) if v == 4.5
        ));
    }
}
