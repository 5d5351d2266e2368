//! Front door tying paths, locks and the merge together.

use std::path::{Path, PathBuf};

use bitframe_dataframe::DataFrame;
use bitframe_result::{Error, Result};
use bitframe_types::{CancelToken, ShardId, TableSchema};

use crate::changeset::ChangesetRequest;
use crate::locks::ShardLockRegistry;
use crate::shard_file::{dataframe_schema, ShardConfig, ShardFile};

/// Owns the dataframe directory tree for a node: one subdirectory per table,
/// one parquet file per shard inside it.
///
/// Writes serialize per shard through the owned [`ShardLockRegistry`]; reads
/// go straight to the committed files and never block on writers.
#[derive(Debug)]
pub struct DataframeStore {
    root: PathBuf,
    config: ShardConfig,
    locks: ShardLockRegistry,
}

impl DataframeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, ShardConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: ShardConfig) -> Self {
        Self {
            root: root.into(),
            config,
            locks: ShardLockRegistry::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> ShardConfig {
        self.config
    }

    /// Directory holding `table`'s shard files.
    pub fn table_dir(&self, table: &str) -> PathBuf {
        self.root.join(table)
    }

    /// Canonical shard path minus the on-disk extension.
    pub fn shard_base(&self, table: &str, shard: ShardId) -> PathBuf {
        self.table_dir(table).join(shard.to_string())
    }

    /// Ingest one changeset into one shard.
    ///
    /// Only one writer is allowed per shard at a time, so this waits for the
    /// shard's lock to become available. Failures are returned synchronously
    /// to the submitter; each shard's commit is independently durable and is
    /// never rolled back because a sibling shard in the same logical batch
    /// failed.
    pub fn apply_changeset(
        &self,
        table: &str,
        shard: ShardId,
        cs: &ChangesetRequest,
        cancel: &CancelToken,
    ) -> Result<()> {
        cancel.check()?;
        let lock = self.locks.lock_for(shard);
        let _guard = lock.lock().unwrap();
        cancel.check()?;

        let file = ShardFile::open_with_config(self.shard_base(table, shard), self.config)?;
        file.apply(cs, cancel)
    }

    /// Read a shard's committed table; `None` when no file exists yet.
    pub fn read_shard(&self, table: &str, shard: ShardId) -> Result<Option<DataFrame>> {
        let file = ShardFile::open_with_config(self.shard_base(table, shard), self.config)?;
        Ok(file.into_table())
    }

    /// Like [`read_shard`], for callers that require data to be present.
    ///
    /// [`read_shard`]: DataframeStore::read_shard
    pub fn read_shard_required(&self, table: &str, shard: ShardId) -> Result<DataFrame> {
        self.read_shard(table, shard)?.ok_or(Error::NoData)
    }

    /// Schema of `table`'s dataframe, derived from its first committed shard
    /// file; `None` when nothing has been committed yet.
    pub fn schema(&self, table: &str) -> Result<Option<TableSchema>> {
        dataframe_schema(&self.table_dir(table))
    }
}
