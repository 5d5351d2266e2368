use rayon::prelude::*;

use bitframe_expr::Value;
use bitframe_result::{Error, Result};
use bitframe_types::{CancelToken, ShardId};

use crate::reduce::Reduction;

/// Fans a per-shard map function out across a bounded worker pool and folds
/// every result into the reduction as it completes.
///
/// Shards are evaluated concurrently with no ordering guarantee; ordering
/// only exists within a shard (writes, by its lock) and the reduction is
/// order-independent by contract. The first map or absorb failure aborts the
/// run; a canceled map call stops contributing to the reduction and
/// propagates [`Error::Canceled`] outward without corrupting the shared
/// accumulator.
pub struct MapReduceEngine {
    pool: rayon::ThreadPool,
}

impl MapReduceEngine {
    /// Build an engine with `fanout` map workers. Zero means one worker per
    /// core.
    pub fn new(fanout: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(fanout)
            .build()
            .map_err(|e| Error::Internal(format!("failed to build map worker pool: {e}")))?;
        Ok(Self { pool })
    }

    /// Run `map_fn` for every shard and absorb each partial result.
    pub fn run<F>(
        &self,
        shards: &[ShardId],
        reduction: &Reduction,
        cancel: &CancelToken,
        map_fn: F,
    ) -> Result<()>
    where
        F: Fn(ShardId) -> Result<Value> + Send + Sync,
    {
        tracing::debug!(shards = shards.len(), "dispatching map phase");
        self.pool.install(|| {
            shards.par_iter().try_for_each(|&shard| {
                cancel.check()?;
                let value = map_fn(shard)?;
                cancel.check()?;
                reduction.absorb(value)
            })
        })
    }
}
