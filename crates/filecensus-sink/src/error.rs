//! Pipeline-level errors.

use std::path::PathBuf;

use filecensus_core::ScanError;
use thiserror::Error;

use crate::writer::WriterError;

/// Fatal error that ends a catalog run.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Configuration or traversal setup failed before any record was produced.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The output could not be opened.
    #[error("Failed to create output {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: WriterError,
    },

    /// Appending a record failed.
    #[error("Failed to write record {index}: {source}")]
    Append {
        /// 0-based position of the record in visit order.
        index: u64,
        #[source]
        source: WriterError,
    },

    /// A durable flush failed.
    #[error("Failed to flush after {records} records: {source}")]
    Flush {
        records: u64,
        #[source]
        source: WriterError,
    },

    /// The output could not be finalized.
    #[error("Failed to finalize output: {source}")]
    Finalize {
        #[source]
        source: WriterError,
    },

    /// The run was cancelled from outside; the output holds a partial catalog.
    #[error("Interrupted after {records} records")]
    Interrupted { records: u64 },
}

impl CatalogError {
    /// True when the output writer failed mid-stream.
    pub fn is_writer_failure(&self) -> bool {
        matches!(
            self,
            Self::Append { .. } | Self::Flush { .. } | Self::Finalize { .. }
        )
    }
}
