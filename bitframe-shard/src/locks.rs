//! Per-shard writer exclusion.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use bitframe_types::ShardId;

/// Hands out the process-wide unique write lock for each shard id.
///
/// The registry is a constructed-once value owned by the serving component,
/// not a global. Its internal map is guarded by a short-held lock so two
/// first-time writers to the same shard can never create two distinct lock
/// objects; the per-shard locks themselves are held for the full duration of
/// a write. Locks are never removed once created; the number of shards is
/// bounded and known.
///
/// Readers are not mediated here: writers merge into a staging copy and
/// switch the durable file atomically via rename, so a concurrent reader
/// only ever observes a fully committed file.
#[derive(Debug, Default)]
pub struct ShardLockRegistry {
    locks: Mutex<FxHashMap<ShardId, Arc<Mutex<()>>>>,
}

impl ShardLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find or create the lock object for `shard`.
    pub fn lock_for(&self, shard: ShardId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        Arc::clone(locks.entry(shard).or_default())
    }
}
