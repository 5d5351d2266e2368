use arrow::array::ArrayRef;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use bitframe_result::{Error, Result};

use crate::resolver::ChunkResolver;

/// One shard's committed table: a schema plus schema-identical chunks.
///
/// Chunks are the unit of row addressing; their boundaries come from the
/// shard file's row groups and are preserved across merges (an append adds
/// one new chunk, it never rewrites boundaries of existing ones).
#[derive(Debug, Clone)]
pub struct DataFrame {
    schema: SchemaRef,
    chunks: Vec<RecordBatch>,
    num_rows: usize,
}

impl DataFrame {
    /// Assemble a frame from chunks, validating that every chunk carries the
    /// frame schema.
    pub fn try_new(schema: SchemaRef, chunks: Vec<RecordBatch>) -> Result<Self> {
        for chunk in &chunks {
            if chunk.schema() != schema {
                return Err(Error::Internal(
                    "dataframe chunk schema differs from table schema".into(),
                ));
            }
        }
        let num_rows = chunks.iter().map(RecordBatch::num_rows).sum();
        Ok(Self {
            schema,
            chunks,
            num_rows,
        })
    }

    /// A frame with no rows and no chunks.
    pub fn empty(schema: SchemaRef) -> Self {
        Self {
            schema,
            chunks: Vec::new(),
            num_rows: 0,
        }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    pub fn chunks(&self) -> &[RecordBatch] {
        &self.chunks
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Row counts per chunk, in chunk order.
    pub fn chunk_lens(&self) -> Vec<usize> {
        self.chunks.iter().map(RecordBatch::num_rows).collect()
    }

    /// Resolver over this frame's full row id space.
    pub fn resolver(&self) -> ChunkResolver {
        ChunkResolver::new(&self.chunk_lens())
    }

    /// The array holding `column`'s values within `chunk`.
    pub fn column_chunk(&self, column: usize, chunk: usize) -> &ArrayRef {
        self.chunks[chunk].column(column)
    }
}
