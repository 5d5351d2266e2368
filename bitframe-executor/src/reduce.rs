use std::sync::Mutex;

use bitframe_expr::{CombineOp, Evaluator, Program, Value};
use bitframe_result::{Error, Result};

/// The in-flight, partially combined result of a distributed reduction.
///
/// Map results arrive in arbitrary order. The first non-empty result becomes
/// the accumulator verbatim; every later one is folded in with the combine
/// operation. Merge order is not controlled, so the caller must guarantee
/// the combine is associative and commutative. The merge itself is
/// serialized by the accumulator mutex because map calls complete
/// concurrently; the mutex is only ever held for the CPU-bound combine,
/// never across a wait.
pub struct Reduction {
    combine: CombineOp,
    accumulator: Mutex<Option<Value>>,
}

impl Reduction {
    pub fn new(combine: CombineOp) -> Self {
        Self {
            combine,
            accumulator: Mutex::new(None),
        }
    }

    /// Fold one map-phase partial result into the accumulator.
    ///
    /// Empty results (shard with no file, no matching rows) contribute
    /// nothing. A combine failure surfaces as [`Error::ReductionType`] and
    /// leaves the accumulator exactly as it was.
    pub fn absorb(&self, value: Value) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        let mut accumulator = self.accumulator.lock().unwrap();
        let next = match accumulator.as_ref() {
            None => value,
            Some(prev) => self.combine.apply(prev, &value)?,
        };
        *accumulator = Some(next);
        Ok(())
    }

    /// Consume the reduction and produce the externally visible answer.
    ///
    /// On a remote (non-initiating) hop the accumulator is forwarded
    /// unfinalized. On the initiating node the optional finishing program
    /// runs once over the combined value. Either way, a reduction that never
    /// accumulated anything fails with [`Error::NoResult`] instead of
    /// inventing a default.
    pub fn finish(
        self,
        evaluator: &dyn Evaluator,
        finalize: Option<&Program>,
        remote: bool,
    ) -> Result<Value> {
        let accumulator = self.accumulator.into_inner().unwrap();
        let Some(value) = accumulator else {
            return Err(Error::NoResult);
        };
        if remote {
            return Ok(value);
        }
        match finalize {
            Some(program) => evaluator.evaluate_value(program, value),
            None => Ok(value),
        }
    }
}
