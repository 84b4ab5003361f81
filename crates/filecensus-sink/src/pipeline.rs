//! The catalog pipeline: traversal producer, bounded queue, sink consumer.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use filecensus_core::{CatalogConfig, CatalogObserver, CatalogSummary, ScanError, TracingObserver};
use filecensus_scan::Traverser;

use crate::columnar::ParquetRecordWriter;
use crate::error::CatalogError;
use crate::sink::Sink;
use crate::writer::RecordWriter;

/// One catalog run over `config.root`.
///
/// The traversal runs on its own thread and pushes records into a queue of
/// `config.buffer_size`; the sink drains it on the calling thread. A sink
/// failure cancels the traversal and closes the queue so the producer never
/// stays blocked on a full queue.
pub struct Catalog {
    config: CatalogConfig,
    observer: Arc<dyn CatalogObserver>,
    cancel: CancellationToken,
}

impl Catalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            observer: Arc::new(TracingObserver),
            cancel: CancellationToken::new(),
        }
    }

    /// Deliver warnings, progress and the summary to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn CatalogObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Token that interrupts the run when cancelled.
    ///
    /// The sink still finalizes what it has received, and the run returns
    /// [`CatalogError::Interrupted`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Catalog into a Parquet file at `config.output`.
    pub fn run(&self) -> Result<CatalogSummary, CatalogError> {
        // Fail on a bad root before the output file is created
        std::fs::symlink_metadata(&self.config.root)
            .map_err(|e| ScanError::io(&self.config.root, e))?;

        let writer = ParquetRecordWriter::create(&self.config.output)
            .map_err(|source| CatalogError::Create {
                path: self.config.output.clone(),
                source,
            })?
            .with_row_group_bytes(self.config.row_group_bytes);

        info!(
            root = %self.config.root.display(),
            output = %self.config.output.display(),
            workers = self.config.workers,
            "Starting catalog"
        );
        self.run_with_writer(writer)
    }

    /// Catalog into an arbitrary writer.
    pub fn run_with_writer<W: RecordWriter>(&self, writer: W) -> Result<CatalogSummary, CatalogError> {
        let started = Instant::now();
        let config = &self.config;

        // Sink failures stop the producer without looking like an interrupt
        let stop = self.cancel.child_token();
        let traverser = Traverser::new(config.batch_tag())
            .workers(config.workers)
            .observer(Arc::clone(&self.observer));
        let sink = Sink::new(writer, config.flush_size).observer(Arc::clone(&self.observer));

        let (tx, mut rx) = mpsc::channel(config.buffer_size.max(1));

        let (produced, consumed) = thread::scope(|scope| {
            let root = config.root.as_path();
            let traverser = &traverser;
            let stop = &stop;
            let producer = scope.spawn(move || traverser.run(root, tx, stop));

            let consumed = sink.drain(&mut rx);
            if let Err(err) = &consumed {
                debug!(error = %err, "Sink failed, cancelling traversal");
                stop.cancel();
            }
            // Unblocks a producer waiting on a full queue
            drop(rx);

            (producer.join(), consumed)
        });

        let stats = produced.map_err(|_| ScanError::ProducerPanicked)?;
        let sink_summary = consumed?;
        let stats = stats?;

        if self.cancel.is_cancelled() {
            return Err(CatalogError::Interrupted {
                records: sink_summary.records_written,
            });
        }

        let summary = CatalogSummary {
            records_written: sink_summary.records_written,
            flushes: sink_summary.flushes,
            warnings: stats.warnings,
            bytes_cataloged: sink_summary.bytes_cataloged,
            elapsed: started.elapsed(),
        };
        self.observer.finished(&summary);
        Ok(summary)
    }
}
