//! Coordinator glue: row filters → shard table reads → expression
//! evaluation → map/reduce.

use bitframe_dataframe::{IndexResolver, RowResolver};
use bitframe_expr::{CombineOp, Evaluator, Program, Value};
use bitframe_result::Result;
use bitframe_shard::DataframeStore;
use bitframe_types::{CancelToken, RowId, ShardId};

use crate::map_reduce::MapReduceEngine;
use crate::reduce::Reduction;

/// Supplies the per-shard row filter for a query.
///
/// This is the seam to the bitmap index: the index evaluates the query's
/// filter call and hands back shard-relative row ids. `None` means the query
/// carries no filter and every row is visible to the map program.
pub trait RowFilterSource: Send + Sync {
    fn shard_rows(&self, shard: ShardId) -> Result<Option<Vec<RowId>>>;
}

/// One distributed apply call.
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    /// Program evaluated against every shard's filtered table.
    pub program: Program,
    /// Optional distinct finishing program, run once at the initiating node.
    pub reduce_program: Option<Program>,
    /// Associative combine merging the per-shard partials.
    pub combine: CombineOp,
    /// True when this node answers a remote hop and must forward the
    /// unfinalized accumulator.
    pub remote: bool,
}

impl ApplyRequest {
    /// A request with the default vector-concatenation reduction and no
    /// finishing program.
    pub fn new(program: Program) -> Self {
        Self {
            program,
            reduce_program: None,
            combine: CombineOp::Concat,
            remote: false,
        }
    }
}

/// Executes apply calls against the local dataframe store.
pub struct ApplyExecutor<'a, E> {
    store: &'a DataframeStore,
    evaluator: E,
    engine: MapReduceEngine,
}

impl<'a, E: Evaluator> ApplyExecutor<'a, E> {
    pub fn new(store: &'a DataframeStore, evaluator: E, engine: MapReduceEngine) -> Self {
        Self {
            store,
            evaluator,
            engine,
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Run the map program over every shard, reduce the partials, and
    /// finalize (unless the request came from a remote hop).
    pub fn execute_apply(
        &self,
        table: &str,
        shards: &[ShardId],
        request: &ApplyRequest,
        filter: Option<&dyn RowFilterSource>,
        cancel: &CancelToken,
    ) -> Result<Value> {
        let reduction = Reduction::new(request.combine);
        self.engine.run(shards, &reduction, cancel, |shard| {
            self.apply_shard(table, shard, request, filter)
        })?;
        reduction.finish(&self.evaluator, request.reduce_program.as_ref(), request.remote)
    }

    /// Map phase for one shard.
    ///
    /// Shards with nothing to contribute (no committed file, an empty
    /// table, an empty or fully out-of-range filter) short-circuit to
    /// [`Value::Empty`] without invoking the evaluator.
    fn apply_shard(
        &self,
        table: &str,
        shard: ShardId,
        request: &ApplyRequest,
        filter: Option<&dyn RowFilterSource>,
    ) -> Result<Value> {
        let rows = match filter {
            Some(source) => source.shard_rows(shard)?,
            None => None,
        };
        if let Some(ids) = rows.as_ref() {
            if ids.is_empty() {
                return Ok(Value::Empty);
            }
        }

        let Some(frame) = self.store.read_shard(table, shard)? else {
            return Ok(Value::Empty);
        };
        if frame.num_rows() == 0 {
            return Ok(Value::Empty);
        }

        let base = frame.resolver();
        match rows {
            Some(ids) => {
                let filtered = IndexResolver::from_filter(&base, &ids);
                if filtered.num_rows() == 0 {
                    return Ok(Value::Empty);
                }
                self.evaluator.evaluate(&request.program, &frame, &filtered)
            }
            None => self.evaluator.evaluate(&request.program, &frame, &base),
        }
    }
}
