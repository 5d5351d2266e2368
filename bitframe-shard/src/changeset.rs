use arrow::datatypes::SchemaRef;

use bitframe_result::{Error, Result};
use bitframe_types::{ColumnValues, RowId, TableSchema};

/// A batch of row-level inserts/updates for one shard.
///
/// `row_ids` are shard-relative and must be non-decreasing: the merge relies
/// on the ordering to split "update existing row" from "append new row" with
/// a single linear scan, and on the last id to size the appended chunk.
/// Batches violating this are rejected up front rather than merged with
/// undefined placement.
#[derive(Debug, Clone)]
pub struct ChangesetRequest {
    pub row_ids: Vec<RowId>,
    pub columns: Vec<ColumnValues>,
    pub schema: TableSchema,
}

impl ChangesetRequest {
    pub fn new(schema: TableSchema, row_ids: Vec<RowId>, columns: Vec<ColumnValues>) -> Self {
        Self {
            row_ids,
            columns,
            schema,
        }
    }

    /// Number of row entries in the batch.
    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// The Arrow schema this changeset implies.
    pub fn arrow_schema(&self) -> SchemaRef {
        self.schema.to_arrow()
    }

    /// Check the batch's internal consistency before any mutation starts.
    pub fn validate(&self) -> Result<()> {
        if self.row_ids.is_empty() {
            return Err(Error::InvalidArgumentError(
                "changeset contains no rows".into(),
            ));
        }
        if self.row_ids[0] < 0 {
            return Err(Error::InvalidArgumentError(format!(
                "changeset row id {} is negative",
                self.row_ids[0]
            )));
        }
        if self.row_ids.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::InvalidArgumentError(
                "changeset row ids must be in non-decreasing order".into(),
            ));
        }
        if self.schema.is_empty() {
            return Err(Error::InvalidArgumentError(
                "changeset declares no columns".into(),
            ));
        }
        if self.columns.len() != self.schema.len() {
            return Err(Error::InvalidArgumentError(format!(
                "changeset has {} column buffers for {} schema columns",
                self.columns.len(),
                self.schema.len()
            )));
        }
        for (column, spec) in self.columns.iter().zip(self.schema.columns()) {
            if column.column_type() != spec.ty {
                return Err(Error::InvalidArgumentError(format!(
                    "column '{}' carries {} values but is declared {}",
                    spec.name,
                    column.column_type(),
                    spec.ty
                )));
            }
            if column.len() != self.row_ids.len() {
                return Err(Error::InvalidArgumentError(format!(
                    "column '{}' has {} values for {} row ids",
                    spec.name,
                    column.len(),
                    self.row_ids.len()
                )));
            }
        }
        Ok(())
    }
}
