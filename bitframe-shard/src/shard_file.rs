//! Shard file lifecycle: open, merge, durable commit.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use arrow::array::ArrayRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use bitframe_dataframe::{ChunkResolver, DataFrame, RowResolver};
use bitframe_result::Result;
use bitframe_types::{CancelToken, ColumnValues, TableSchema};

use crate::changeset::ChangesetRequest;

/// Extension of a committed shard file.
pub const DATA_EXTENSION: &str = "parquet";
/// Extension of the in-flight commit file that is renamed over the canonical
/// path.
pub const TEMP_EXTENSION: &str = "temp.parquet";

/// Chunk sizing for shard files.
#[derive(Debug, Clone, Copy)]
pub struct ShardConfig {
    /// Upper bound on rows per chunk, applied both to written row groups and
    /// to batches read back from them.
    pub chunk_rows: usize,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self { chunk_rows: 1024 }
    }
}

/// One shard's dataframe, read fully into memory for the duration of a
/// single write (or map-phase read).
///
/// The lifecycle mirrors the commit protocol: `open` loads the committed
/// file (or an empty state when no file exists yet), [`ShardFile::apply`]
/// merges one changeset into a staging copy and commits it, and the instance
/// is consumed: after a commit the durable file is the source of truth and
/// the in-memory copy is discarded.
#[derive(Debug)]
pub struct ShardFile {
    base: PathBuf,
    config: ShardConfig,
    schema: Option<TableSchema>,
    table: Option<DataFrame>,
}

impl ShardFile {
    pub fn open(base: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_config(base, ShardConfig::default())
    }

    /// Open `base` (the canonical path minus extension), reading the
    /// committed table if one exists. A missing file is the valid "no data
    /// yet" state, not an error.
    pub fn open_with_config(base: impl Into<PathBuf>, config: ShardConfig) -> Result<Self> {
        let base = base.into();
        let data = data_path(&base);
        if !data.exists() {
            return Ok(Self {
                base,
                config,
                schema: None,
                table: None,
            });
        }

        let file = File::open(&data)?;
        let builder =
            ParquetRecordBatchReaderBuilder::try_new(file)?.with_batch_size(config.chunk_rows);
        let arrow_schema = builder.schema().clone();
        let schema = TableSchema::from_arrow(&arrow_schema)?;
        let chunks = builder
            .build()?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let table = DataFrame::try_new(arrow_schema, chunks)?;
        Ok(Self {
            base,
            config,
            schema: Some(schema),
            table: Some(table),
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    pub fn table(&self) -> Option<&DataFrame> {
        self.table.as_ref()
    }

    pub fn into_table(self) -> Option<DataFrame> {
        self.table
    }

    pub fn num_rows(&self) -> usize {
        self.table.as_ref().map_or(0, DataFrame::num_rows)
    }

    /// Merge one changeset and commit the result durably.
    ///
    /// The whole operation is atomic from a reader's point of view: the
    /// merge happens on an owned staging copy and the new file replaces the
    /// old one via rename, so a failure at any stage leaves the committed
    /// file untouched.
    pub fn apply(self, cs: &ChangesetRequest, cancel: &CancelToken) -> Result<()> {
        cs.validate()?;
        let schema = match TableSchema::reconcile(self.schema.as_ref(), &cs.schema) {
            Ok(schema) => schema,
            Err(err) => {
                tracing::warn!(shard = %self.base.display(), %err, "rejected changeset");
                return Err(err);
            }
        };

        let chunks = self.merge(&schema, cs)?;
        cancel.check()?;
        self.commit(&schema, &chunks)?;
        tracing::debug!(shard = %self.base.display(), rows = cs.len(), "committed changeset");
        Ok(())
    }

    /// Build the updated chunk sequence: staged copies of the committed
    /// chunks with in-place overwrites applied, plus at most one appended
    /// chunk for rows beyond the committed row count.
    fn merge(&self, schema: &TableSchema, cs: &ChangesetRequest) -> Result<Vec<RecordBatch>> {
        let row_count = self.num_rows();

        // Stage committed chunks as owned buffers, indexed [chunk][column].
        // Committed Arrow memory is never written through.
        let mut staged: Vec<Vec<ColumnValues>> = Vec::new();
        if let Some(table) = &self.table {
            for chunk_idx in 0..table.num_chunks() {
                let mut columns = Vec::with_capacity(schema.len());
                for col_idx in 0..schema.len() {
                    columns.push(ColumnValues::from_array(
                        table.column_chunk(col_idx, chunk_idx).as_ref(),
                    )?);
                }
                staged.push(columns);
            }
        }

        // Update pass: overwrite rows the table already has. The scan stops
        // at the first id beyond the committed rows; everything after it is
        // append territory because ids are sorted.
        let chunk_lens: Vec<usize> = staged
            .iter()
            .map(|columns| columns.first().map_or(0, ColumnValues::len))
            .collect();
        let resolver = ChunkResolver::new(&chunk_lens);
        let mut split = cs.len();
        for (i, &row) in cs.row_ids.iter().enumerate() {
            if row as usize >= row_count {
                split = i;
                break;
            }
            let (chunk, offset) = resolver.resolve(row as usize);
            for (col_idx, column) in cs.columns.iter().enumerate() {
                staged[chunk][col_idx].copy_from(offset, column, i)?;
            }
        }

        // Append pass: the last (largest) id determines how many new rows to
        // allocate; rows the changeset never names keep their zero
        // placeholder.
        let last = cs.row_ids[cs.len() - 1];
        let new_rows = last - row_count as i64 + 1;
        if new_rows > 0 {
            let mut appended: Vec<ColumnValues> = schema
                .columns()
                .iter()
                .map(|c| ColumnValues::zeroed(c.ty, new_rows as usize))
                .collect();
            for i in split..cs.len() {
                let idx = (cs.row_ids[i] - row_count as i64) as usize;
                for (col_idx, column) in cs.columns.iter().enumerate() {
                    appended[col_idx].copy_from(idx, column, i)?;
                }
            }
            staged.push(appended);
        }

        let arrow_schema = schema.to_arrow();
        let mut chunks = Vec::with_capacity(staged.len());
        for columns in staged {
            let arrays: Vec<ArrayRef> = columns
                .into_iter()
                .map(ColumnValues::into_array)
                .collect();
            chunks.push(RecordBatch::try_new(arrow_schema.clone(), arrays)?);
        }
        Ok(chunks)
    }

    /// Serialize the chunk sequence to `<base>.temp.parquet` and atomically
    /// rename it over `<base>.parquet`. The changeset is durable only after
    /// the rename returns.
    fn commit(&self, schema: &TableSchema, chunks: &[RecordBatch]) -> Result<()> {
        let dest = data_path(&self.base);
        let temp = temp_path(&self.base);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .set_max_row_group_size(self.config.chunk_rows)
            .build();
        let file = File::create(&temp)?;
        let mut writer = ArrowWriter::try_new(file, schema.to_arrow(), Some(props))?;
        for chunk in chunks {
            writer.write(chunk)?;
        }
        writer.close()?;

        fs::rename(&temp, &dest)?;
        Ok(())
    }
}

/// Canonical path of the committed file for a shard base path.
pub fn data_path(base: &Path) -> PathBuf {
    base.with_extension(DATA_EXTENSION)
}

/// Path the in-flight commit is written to before the rename.
pub fn temp_path(base: &Path) -> PathBuf {
    base.with_extension(TEMP_EXTENSION)
}

/// Derive a table's dataframe schema from its first committed shard file.
///
/// Returns `Ok(None)` when the directory does not exist or holds no
/// committed shard file yet. Only the parquet footer is read.
pub fn dataframe_schema(dir: &Path) -> Result<Option<TableSchema>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut committed: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(".parquet") && !name.ends_with(".temp.parquet") {
            committed.push(path);
        }
    }
    committed.sort();

    match committed.first() {
        Some(path) => {
            let file = File::open(path)?;
            let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
            let schema = TableSchema::from_arrow(builder.schema())?;
            Ok(Some(schema))
        }
        None => Ok(None),
    }
}
