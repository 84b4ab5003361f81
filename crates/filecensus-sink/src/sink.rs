//! Consumer side of the pipeline: batching, flush cadence and finalize.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::debug;

use filecensus_core::{CatalogObserver, FileRecord, FlushProgress, TracingObserver};

use crate::error::CatalogError;
use crate::writer::RecordWriter;

/// Counters reported by a finished sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkSummary {
    /// Records appended to the writer.
    pub records_written: u64,
    /// Durable flushes issued, including the final partial one.
    pub flushes: u64,
    /// Sum of `size_bytes` over all records.
    pub bytes_cataloged: u64,
}

/// Appends records in arrival order and flushes every `flush_size` records.
///
/// A final flush covers any partial batch, so a run of `n` records issues
/// exactly `ceil(n / flush_size)` flushes. Every writer error is fatal.
pub struct Sink<W> {
    writer: W,
    flush_size: u64,
    observer: Arc<dyn CatalogObserver>,
    started: Instant,
    pending: u64,
    summary: SinkSummary,
}

impl<W: RecordWriter> Sink<W> {
    /// Create a sink flushing every `flush_size` records (minimum 1).
    pub fn new(writer: W, flush_size: usize) -> Self {
        Self {
            writer,
            flush_size: flush_size.max(1) as u64,
            observer: Arc::new(TracingObserver),
            started: Instant::now(),
            pending: 0,
            summary: SinkSummary::default(),
        }
    }

    /// Report flush progress to `observer`.
    pub fn observer(mut self, observer: Arc<dyn CatalogObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Counters so far.
    pub fn summary(&self) -> SinkSummary {
        self.summary
    }

    /// Append one record, flushing if the batch is full.
    pub fn write(&mut self, record: FileRecord) -> Result<(), CatalogError> {
        let index = self.summary.records_written;
        let size = u64::try_from(record.size_bytes()).unwrap_or(0);

        self.writer
            .append(record)
            .map_err(|source| CatalogError::Append { index, source })?;

        self.summary.records_written += 1;
        self.summary.bytes_cataloged += size;
        self.pending += 1;

        if self.pending >= self.flush_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Drain `rx` until it is closed and empty, then finalize.
    ///
    /// Returns early on the first writer error; the caller is responsible
    /// for stopping the producer.
    pub fn drain(mut self, rx: &mut mpsc::Receiver<FileRecord>) -> Result<SinkSummary, CatalogError> {
        while let Some(record) = rx.blocking_recv() {
            self.write(record)?;
        }
        self.finish()
    }

    /// Flush the partial batch, if any, and finalize the output.
    pub fn finish(mut self) -> Result<SinkSummary, CatalogError> {
        if self.pending > 0 {
            self.flush()?;
        }
        self.writer
            .finish()
            .map_err(|source| CatalogError::Finalize { source })?;

        debug!(
            records = self.summary.records_written,
            flushes = self.summary.flushes,
            "Sink finalized"
        );
        Ok(self.summary)
    }

    fn flush(&mut self) -> Result<(), CatalogError> {
        let records = self.summary.records_written;
        self.writer
            .flush()
            .map_err(|source| CatalogError::Flush { records, source })?;

        self.pending = 0;
        self.summary.flushes += 1;
        self.observer.flushed(&FlushProgress {
            records_written: records,
            flush_number: self.summary.flushes,
            elapsed: self.started.elapsed(),
        });
        Ok(())
    }
}
