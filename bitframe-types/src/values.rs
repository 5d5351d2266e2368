//! Typed column value buffers.
//!
//! `ColumnValues` is the owned, mutable staging representation of one column
//! chunk. The write path copies committed Arrow buffers into these before
//! merging a changeset, so shared Arrow memory is never mutated in place.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array};

use bitframe_result::{Error, Result};

use crate::schema::ColumnType;

/// A contiguous buffer of column values with a closed tag set.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
}

impl ColumnValues {
    /// The column type this buffer holds.
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnValues::Int64(_) => ColumnType::Int64,
            ColumnValues::Float64(_) => ColumnType::Float64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Int64(v) => v.len(),
            ColumnValues::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A zero-filled buffer of `len` values. Newly allocated rows a changeset
    /// never names keep this placeholder value.
    pub fn zeroed(ty: ColumnType, len: usize) -> Self {
        match ty {
            ColumnType::Int64 => ColumnValues::Int64(vec![0; len]),
            ColumnType::Float64 => ColumnValues::Float64(vec![0.0; len]),
        }
    }

    /// Copy an Arrow array into an owned staging buffer.
    ///
    /// This is the deserialization boundary: any array type outside the
    /// closed set fails with [`Error::UnsupportedType`].
    pub fn from_array(array: &dyn Array) -> Result<Self> {
        if let Some(ints) = array.as_any().downcast_ref::<Int64Array>() {
            return Ok(ColumnValues::Int64(ints.values().to_vec()));
        }
        if let Some(floats) = array.as_any().downcast_ref::<Float64Array>() {
            return Ok(ColumnValues::Float64(floats.values().to_vec()));
        }
        Err(Error::UnsupportedType(array.data_type().to_string()))
    }

    /// Hand the staged buffer off to Arrow for serialization.
    pub fn into_array(self) -> ArrayRef {
        match self {
            ColumnValues::Int64(v) => Arc::new(Int64Array::from(v)),
            ColumnValues::Float64(v) => Arc::new(Float64Array::from(v)),
        }
    }

    /// Overwrite `self[dst_idx]` with `src[src_idx]`.
    ///
    /// Both buffers must carry the same column type; schema reconciliation
    /// guarantees that before any merge starts, so a mismatch here is a bug.
    pub fn copy_from(&mut self, dst_idx: usize, src: &ColumnValues, src_idx: usize) -> Result<()> {
        match (self, src) {
            (ColumnValues::Int64(dst), ColumnValues::Int64(src)) => {
                dst[dst_idx] = src[src_idx];
                Ok(())
            }
            (ColumnValues::Float64(dst), ColumnValues::Float64(src)) => {
                dst[dst_idx] = src[src_idx];
                Ok(())
            }
            (dst, src) => Err(Error::Internal(format!(
                "staging type {} does not match changeset type {}",
                dst.column_type(),
                src.column_type()
            ))),
        }
    }
}
