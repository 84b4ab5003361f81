//! Parquet output for catalog records.
//!
//! Records are accumulated in Arrow column builders, written to the
//! [`ArrowWriter`] in small batches, and the in-progress row group is closed
//! either on an explicit flush or once its encoded size reaches the
//! configured threshold.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Int64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use tracing::debug;

use filecensus_core::{DEFAULT_ROW_GROUP_BYTES, FileRecord};

use crate::writer::{RecordWriter, WriterError};

/// Records buffered in the column builders before they are handed to the
/// Parquet encoder.
const DEFAULT_BATCH_ROWS: usize = 1024;

/// Column names, in schema order.
pub const COLUMNS: [&str; 18] = [
    "file_path",
    "file_name",
    "directory",
    "size_bytes",
    "creation_time_utc",
    "modification_time_utc",
    "access_time_utc",
    "file_mode",
    "is_directory",
    "is_file",
    "is_symlink",
    "is_hidden",
    "is_system",
    "is_archive",
    "is_readonly",
    "file_extension",
    "sha256",
    "parquet_file_name",
];

/// Arrow schema of the catalog file.
///
/// Timestamps are whole seconds since the Unix epoch. `sha256` is the only
/// nullable column: it is null for every entry that is not a successfully
/// hashed regular file.
pub fn catalog_schema() -> Schema {
    Schema::new(vec![
        Field::new("file_path", DataType::Utf8, false),
        Field::new("file_name", DataType::Utf8, false),
        Field::new("directory", DataType::Utf8, false),
        Field::new("size_bytes", DataType::Int64, false),
        Field::new("creation_time_utc", DataType::Int64, false),
        Field::new("modification_time_utc", DataType::Int64, false),
        Field::new("access_time_utc", DataType::Int64, false),
        Field::new("file_mode", DataType::Utf8, false),
        Field::new("is_directory", DataType::Boolean, false),
        Field::new("is_file", DataType::Boolean, false),
        Field::new("is_symlink", DataType::Boolean, false),
        Field::new("is_hidden", DataType::Boolean, false),
        Field::new("is_system", DataType::Boolean, false),
        Field::new("is_archive", DataType::Boolean, false),
        Field::new("is_readonly", DataType::Boolean, false),
        Field::new("file_extension", DataType::Utf8, false),
        Field::new("sha256", DataType::Utf8, true),
        Field::new("parquet_file_name", DataType::Utf8, false),
    ])
}

/// Writer properties used for every catalog file.
fn writer_properties() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_dictionary_enabled(true)
        .set_statistics_enabled(EnabledStatistics::Page)
        .set_created_by(format!("filecensus {}", env!("CARGO_PKG_VERSION")))
        .build()
}

/// One Arrow builder per column.
struct ColumnBuilders {
    file_path: StringBuilder,
    file_name: StringBuilder,
    directory: StringBuilder,
    size_bytes: Int64Builder,
    created: Int64Builder,
    modified: Int64Builder,
    accessed: Int64Builder,
    file_mode: StringBuilder,
    is_directory: BooleanBuilder,
    is_file: BooleanBuilder,
    is_symlink: BooleanBuilder,
    is_hidden: BooleanBuilder,
    is_system: BooleanBuilder,
    is_archive: BooleanBuilder,
    is_readonly: BooleanBuilder,
    file_extension: StringBuilder,
    sha256: StringBuilder,
    parquet_file_name: StringBuilder,
    rows: usize,
}

impl ColumnBuilders {
    fn with_capacity(rows: usize) -> Self {
        Self {
            file_path: StringBuilder::with_capacity(rows, rows * 64),
            file_name: StringBuilder::with_capacity(rows, rows * 24),
            directory: StringBuilder::with_capacity(rows, rows * 48),
            size_bytes: Int64Builder::with_capacity(rows),
            created: Int64Builder::with_capacity(rows),
            modified: Int64Builder::with_capacity(rows),
            accessed: Int64Builder::with_capacity(rows),
            file_mode: StringBuilder::with_capacity(rows, rows * 10),
            is_directory: BooleanBuilder::with_capacity(rows),
            is_file: BooleanBuilder::with_capacity(rows),
            is_symlink: BooleanBuilder::with_capacity(rows),
            is_hidden: BooleanBuilder::with_capacity(rows),
            is_system: BooleanBuilder::with_capacity(rows),
            is_archive: BooleanBuilder::with_capacity(rows),
            is_readonly: BooleanBuilder::with_capacity(rows),
            file_extension: StringBuilder::with_capacity(rows, rows * 4),
            sha256: StringBuilder::with_capacity(rows, rows * 64),
            parquet_file_name: StringBuilder::with_capacity(rows, rows * 24),
            rows: 0,
        }
    }

    fn push(&mut self, record: &FileRecord) {
        let times = record.times();
        let attributes = record.attributes();

        self.file_path.append_value(record.path());
        self.file_name.append_value(record.name());
        self.directory.append_value(record.directory());
        self.size_bytes.append_value(record.size_bytes());
        self.created.append_value(times.created);
        self.modified.append_value(times.modified);
        self.accessed.append_value(times.accessed);
        self.file_mode.append_value(record.mode());
        self.is_directory.append_value(record.is_directory());
        self.is_file.append_value(record.is_file());
        self.is_symlink.append_value(record.is_symlink());
        self.is_hidden.append_value(attributes.hidden);
        self.is_system.append_value(attributes.system);
        self.is_archive.append_value(attributes.archive);
        self.is_readonly.append_value(attributes.read_only);
        self.file_extension.append_value(record.extension());
        self.sha256.append_option(record.content_hash_hex());
        self.parquet_file_name.append_value(record.batch_tag());
        self.rows += 1;
    }

    fn len(&self) -> usize {
        self.rows
    }

    /// Drain the builders into a batch.
    fn finish(&mut self, schema: &SchemaRef) -> Result<RecordBatch, ArrowError> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(self.file_path.finish()),
            Arc::new(self.file_name.finish()),
            Arc::new(self.directory.finish()),
            Arc::new(self.size_bytes.finish()),
            Arc::new(self.created.finish()),
            Arc::new(self.modified.finish()),
            Arc::new(self.accessed.finish()),
            Arc::new(self.file_mode.finish()),
            Arc::new(self.is_directory.finish()),
            Arc::new(self.is_file.finish()),
            Arc::new(self.is_symlink.finish()),
            Arc::new(self.is_hidden.finish()),
            Arc::new(self.is_system.finish()),
            Arc::new(self.is_archive.finish()),
            Arc::new(self.is_readonly.finish()),
            Arc::new(self.file_extension.finish()),
            Arc::new(self.sha256.finish()),
            Arc::new(self.parquet_file_name.finish()),
        ];
        self.rows = 0;
        RecordBatch::try_new(Arc::clone(schema), columns)
    }
}

/// [`RecordWriter`] producing a single SNAPPY-compressed Parquet file.
pub struct ParquetRecordWriter {
    path: PathBuf,
    schema: SchemaRef,
    writer: Option<ArrowWriter<File>>,
    builders: ColumnBuilders,
    batch_rows: usize,
    row_group_bytes: usize,
}

impl ParquetRecordWriter {
    /// Create (or truncate) `path` and open a writer on it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WriterError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let schema: SchemaRef = Arc::new(catalog_schema());
        let writer = ArrowWriter::try_new(file, Arc::clone(&schema), Some(writer_properties()))?;

        Ok(Self {
            path: path.to_path_buf(),
            schema,
            writer: Some(writer),
            builders: ColumnBuilders::with_capacity(DEFAULT_BATCH_ROWS),
            batch_rows: DEFAULT_BATCH_ROWS,
            row_group_bytes: DEFAULT_ROW_GROUP_BYTES,
        })
    }

    /// Close the in-progress row group once its encoded size reaches `bytes`.
    pub fn with_row_group_bytes(mut self, bytes: usize) -> Self {
        self.row_group_bytes = bytes.max(1);
        self
    }

    /// Hand buffered records to the encoder every `rows` appends.
    pub fn with_batch_rows(mut self, rows: usize) -> Self {
        self.batch_rows = rows.max(1);
        self
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&mut self) -> Result<&mut ArrowWriter<File>, WriterError> {
        self.writer.as_mut().ok_or(WriterError::Finished)
    }

    /// Move buffered records into the encoder, closing the row group if it
    /// has grown past the threshold.
    fn write_pending(&mut self) -> Result<(), WriterError> {
        if self.builders.len() == 0 {
            return Ok(());
        }
        let batch = self.builders.finish(&self.schema)?;
        let threshold = self.row_group_bytes;
        let writer = self.writer()?;
        writer.write(&batch)?;

        if writer.in_progress_size() >= threshold {
            debug!(
                rows = writer.in_progress_rows(),
                bytes = writer.in_progress_size(),
                "Row group size threshold reached"
            );
            writer.flush()?;
        }
        Ok(())
    }
}

impl RecordWriter for ParquetRecordWriter {
    fn append(&mut self, record: FileRecord) -> Result<(), WriterError> {
        if self.writer.is_none() {
            return Err(WriterError::Finished);
        }
        self.builders.push(&record);
        if self.builders.len() >= self.batch_rows {
            self.write_pending()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriterError> {
        self.write_pending()?;
        self.writer()?.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), WriterError> {
        self.write_pending()?;
        let writer = self.writer.take().ok_or(WriterError::Finished)?;
        let metadata = writer.close()?;
        debug!(
            path = %self.path.display(),
            rows = metadata.num_rows,
            row_groups = metadata.row_groups.len(),
            "Parquet file finalized"
        );
        Ok(())
    }
}
