//! Dataframe column types and schemas.
//!
//! The type set is deliberately closed: every column is either `Int64` or
//! `Float64`. Anything else a shard file could contain is rejected with
//! [`Error::UnsupportedType`] at the deserialization boundary, which keeps
//! every downstream match exhaustive.

use std::fmt;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

use bitframe_result::{Error, Result};

/// Physical type of a dataframe column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
}

impl ColumnType {
    /// The Arrow type this column is stored as.
    pub fn to_arrow(self) -> DataType {
        match self {
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float64 => DataType::Float64,
        }
    }

    /// Map an Arrow type back into the closed set.
    pub fn from_arrow(dtype: &DataType) -> Result<Self> {
        match dtype {
            DataType::Int64 => Ok(ColumnType::Int64),
            DataType::Float64 => Ok(ColumnType::Float64),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int64 => write!(f, "int64"),
            ColumnType::Float64 => write!(f, "float64"),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub ty: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Ordered list of named, typed columns.
///
/// Structural equality (same length, names, order and types) is what
/// [`TableSchema::reconcile`] enforces between a committed shard and an
/// incoming changeset. There is no schema evolution on this path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<ColumnSpec>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Validate an incoming schema against an optionally existing one.
    ///
    /// If no schema is committed yet the incoming one is adopted. Otherwise
    /// the two must be structurally equal; any mismatch fails with
    /// [`Error::SchemaMismatch`] before the caller mutates anything.
    pub fn reconcile(existing: Option<&TableSchema>, incoming: &TableSchema) -> Result<TableSchema> {
        match existing {
            None => Ok(incoming.clone()),
            Some(existing) if existing == incoming => Ok(incoming.clone()),
            Some(existing) => Err(Error::schema_mismatch(
                existing.to_string(),
                incoming.to_string(),
            )),
        }
    }

    /// Build the Arrow schema this table is serialized with.
    pub fn to_arrow(&self) -> SchemaRef {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|c| Field::new(c.name.clone(), c.ty.to_arrow(), false))
            .collect();
        Arc::new(Schema::new(fields))
    }

    /// Recover a table schema from an Arrow schema read out of a shard file.
    ///
    /// Fails with [`Error::UnsupportedType`] if any field falls outside the
    /// closed column type set.
    pub fn from_arrow(schema: &Schema) -> Result<TableSchema> {
        let columns = schema
            .fields()
            .iter()
            .map(|f| {
                Ok(ColumnSpec::new(
                    f.name().as_str(),
                    ColumnType::from_arrow(f.data_type())?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TableSchema::new(columns))
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", c.name, c.ty)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_col_schema() -> TableSchema {
        TableSchema::new(vec![
            ColumnSpec::new("a", ColumnType::Int64),
            ColumnSpec::new("b", ColumnType::Float64),
        ])
    }

    #[test]
    fn reconcile_adopts_incoming_when_absent() {
        let incoming = two_col_schema();
        let out = TableSchema::reconcile(None, &incoming).unwrap();
        assert_eq!(out, incoming);
    }

    #[test]
    fn reconcile_accepts_structural_equal() {
        let a = two_col_schema();
        let b = two_col_schema();
        assert!(TableSchema::reconcile(Some(&a), &b).is_ok());
    }

    #[test]
    fn reconcile_rejects_renamed_column() {
        let existing = two_col_schema();
        let incoming = TableSchema::new(vec![
            ColumnSpec::new("a", ColumnType::Int64),
            ColumnSpec::new("c", ColumnType::Float64),
        ]);
        let err = TableSchema::reconcile(Some(&existing), &incoming).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn reconcile_rejects_reordered_columns() {
        let existing = two_col_schema();
        let incoming = TableSchema::new(vec![
            ColumnSpec::new("b", ColumnType::Float64),
            ColumnSpec::new("a", ColumnType::Int64),
        ]);
        assert!(TableSchema::reconcile(Some(&existing), &incoming).is_err());
    }

    #[test]
    fn arrow_round_trip_preserves_schema() {
        let schema = two_col_schema();
        let arrow = schema.to_arrow();
        let back = TableSchema::from_arrow(&arrow).unwrap();
        assert_eq!(schema, back);
    }

    #[test]
    fn from_arrow_rejects_types_outside_closed_set() {
        let arrow = Schema::new(vec![Field::new("s", DataType::Utf8, false)]);
        let err = TableSchema::from_arrow(&arrow).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }
}
