//! Row-to-chunk resolution.

use bitframe_types::RowId;

/// Maps iteration positions to physical `(chunk, offset)` locations.
///
/// For a [`ChunkResolver`] the position *is* the row id; for an
/// [`IndexResolver`] positions walk an explicit filtered id list. Evaluators
/// only ever see this trait, so filtered and unfiltered iteration share one
/// code path.
pub trait RowResolver {
    /// Number of addressable positions.
    fn num_rows(&self) -> usize;

    /// Physical location of position `pos`. Callers must keep
    /// `pos < num_rows()`.
    fn resolve(&self, pos: usize) -> (usize, usize);
}

/// Resolver over a column's full chunk sequence.
///
/// Resolution is a forward linear scan over cumulative chunk ends. Chunk
/// counts are small relative to row counts, so the scan beats keeping a
/// search structure in sync with every merge.
#[derive(Debug, Clone)]
pub struct ChunkResolver {
    ends: Vec<usize>,
    num_rows: usize,
}

impl ChunkResolver {
    pub fn new(chunk_lens: &[usize]) -> Self {
        let mut ends = Vec::with_capacity(chunk_lens.len());
        let mut total = 0;
        for len in chunk_lens {
            total += len;
            ends.push(total);
        }
        Self {
            ends,
            num_rows: total,
        }
    }

    pub fn num_chunks(&self) -> usize {
        self.ends.len()
    }
}

impl RowResolver for ChunkResolver {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn resolve(&self, row: usize) -> (usize, usize) {
        debug_assert!(row < self.num_rows, "row {row} out of range");
        let mut start = 0;
        for (chunk, &end) in self.ends.iter().enumerate() {
            if row < end {
                return (chunk, row - start);
            }
            start = end;
        }
        // Out-of-range rows are a caller bug; debug builds assert above.
        (self.ends.len().saturating_sub(1), 0)
    }
}

/// Resolver over an explicit, arbitrary-order row id list.
///
/// Built once per query from the shard's row filter; ids at or beyond the
/// table's row count (and negative ids) are silently skipped, so the slot
/// list may be shorter than the filter.
#[derive(Debug, Clone)]
pub struct IndexResolver {
    slots: Vec<(usize, usize)>,
}

impl IndexResolver {
    pub fn from_filter(base: &ChunkResolver, row_ids: &[RowId]) -> Self {
        let mut slots = Vec::with_capacity(row_ids.len());
        for &id in row_ids {
            if id < 0 || id as usize >= base.num_rows() {
                continue;
            }
            slots.push(base.resolve(id as usize));
        }
        Self { slots }
    }
}

impl RowResolver for IndexResolver {
    fn num_rows(&self) -> usize {
        self.slots.len()
    }

    fn resolve(&self, pos: usize) -> (usize, usize) {
        self.slots[pos]
    }
}
