//! The external columnar writer contract.

use filecensus_core::FileRecord;
use thiserror::Error;

/// Failure inside a [`RecordWriter`].
#[derive(Debug, Error)]
pub enum WriterError {
    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The Parquet encoder rejected the data or failed to write it.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A record batch could not be assembled.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The writer was used after `finish`.
    #[error("Writer already finished")]
    Finished,
}

/// Destination for catalog records.
///
/// Records arrive in visit order. `flush` makes everything appended so far
/// durable; `finish` flushes the remainder and finalizes the output. Every
/// error is fatal to the run.
pub trait RecordWriter {
    /// Append one record.
    fn append(&mut self, record: FileRecord) -> Result<(), WriterError>;

    /// Make all appended records durable.
    fn flush(&mut self) -> Result<(), WriterError>;

    /// Finalize the output. No further calls are valid afterwards.
    fn finish(&mut self) -> Result<(), WriterError>;
}

impl<W: RecordWriter + ?Sized> RecordWriter for &mut W {
    fn append(&mut self, record: FileRecord) -> Result<(), WriterError> {
        (**self).append(record)
    }

    fn flush(&mut self) -> Result<(), WriterError> {
        (**self).flush()
    }

    fn finish(&mut self) -> Result<(), WriterError> {
        (**self).finish()
    }
}

impl<W: RecordWriter + ?Sized> RecordWriter for Box<W> {
    fn append(&mut self, record: FileRecord) -> Result<(), WriterError> {
        (**self).append(record)
    }

    fn flush(&mut self) -> Result<(), WriterError> {
        (**self).flush()
    }

    fn finish(&mut self) -> Result<(), WriterError> {
        (**self).finish()
    }
}
