//! Pre-order directory traversal feeding the catalog queue.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jwalk::{Parallelism, WalkDir};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use filecensus_core::{
    AttributeStrategy, CatalogObserver, FileRecord, ScanError, ScanWarning, TracingObserver,
};

use crate::attributes::NativeAttributes;
use crate::enrich::{Enriched, Enricher, RawEntry};
use crate::hasher::ContentHasher;

/// Entries handed to the hash pool at once, per worker.
const WINDOW_PER_WORKER: usize = 16;

/// Counters for one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Entries whose metadata was read.
    pub visited: u64,
    /// Records handed to the consumer.
    pub emitted: u64,
    /// Non-fatal warnings raised.
    pub warnings: u64,
    /// The walk stopped early (cancelled or consumer gone).
    pub cancelled: bool,
}

/// Walks a tree in pre-order and emits one enriched record per entry.
///
/// The walk itself is sequential and never follows symlinks. With more than
/// one worker, hashing runs on a rayon pool over fixed-size windows of
/// visited entries; each window is emitted in visit order.
pub struct Traverser<A = NativeAttributes> {
    enricher: Enricher<A>,
    workers: usize,
    observer: Arc<dyn CatalogObserver>,
}

impl Traverser<NativeAttributes> {
    /// Create a traverser using the build target's attribute strategy.
    pub fn new(batch_tag: impl Into<String>) -> Self {
        Self::with_strategy(NativeAttributes::default(), batch_tag)
    }
}

impl<A: AttributeStrategy> Traverser<A> {
    /// Create a traverser with an explicit attribute strategy.
    pub fn with_strategy(strategy: A, batch_tag: impl Into<String>) -> Self {
        Self {
            enricher: Enricher::new(strategy, ContentHasher::new(), batch_tag),
            workers: 1,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Number of hashing workers (1 = hash inline).
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Replace the hasher.
    pub fn hasher(mut self, hasher: ContentHasher) -> Self {
        self.enricher = self.enricher.with_hasher(hasher);
        self
    }

    /// Deliver warnings and visits to `observer`.
    pub fn observer(mut self, observer: Arc<dyn CatalogObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Walk `root`, pushing records into the bounded queue.
    ///
    /// Blocks while the queue is full. Returns once the walk completes, the
    /// token is cancelled, or the receiver is dropped. The sender is dropped
    /// on return, which closes the queue.
    pub fn run(
        &self,
        root: &Path,
        tx: mpsc::Sender<FileRecord>,
        cancel: &CancellationToken,
    ) -> Result<TraversalStats, ScanError> {
        self.walk(root, cancel, |record| tx.blocking_send(record).is_ok())
    }

    /// Walk `root`, handing each record to `emit` in visit order.
    ///
    /// `emit` returns `false` when the consumer is gone; the walk then stops.
    pub fn walk<F>(
        &self,
        root: &Path,
        cancel: &CancellationToken,
        mut emit: F,
    ) -> Result<TraversalStats, ScanError>
    where
        F: FnMut(FileRecord) -> bool,
    {
        let root_metadata = std::fs::symlink_metadata(root).map_err(|e| ScanError::io(root, e))?;
        let pool = self.build_pool()?;
        let window_size = if pool.is_some() {
            self.workers * WINDOW_PER_WORKER
        } else {
            1
        };

        let mut stats = TraversalStats::default();
        let mut window: Vec<RawEntry> = Vec::with_capacity(window_size);

        if !root_metadata.is_dir() {
            self.observer.entry_visited(root);
            stats.visited += 1;
            window.push(RawEntry::new(root.to_path_buf(), root_metadata));
            self.drain_window(&mut window, pool.as_ref(), cancel, &mut stats, &mut emit);
            stats.cancelled |= cancel.is_cancelled();
            return Ok(stats);
        }

        let listing_cancel = cancel.clone();
        let walker = WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(false)
            .min_depth(0)
            .process_read_dir(move |_depth, _path, _state, children| {
                // Do not descend once the run is cancelled
                if listing_cancel.is_cancelled() {
                    children.clear();
                }
            });

        // Directory whose listing failure was already reported
        let mut unreadable: Option<PathBuf> = None;

        for entry_result in walker {
            if cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }

            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_else(|| root.to_path_buf());
                    if unreadable.as_deref() != Some(path.as_path()) {
                        self.warn(&mut stats, ScanWarning::path_access(path, &err));
                    }
                    continue;
                }
            };

            let path = entry.path();
            if let Some(err) = &entry.read_children_error {
                self.warn(&mut stats, ScanWarning::path_access(&path, err));
                unreadable = Some(path.clone());
            }
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(err) => {
                    self.warn(&mut stats, ScanWarning::metadata(&path, &err));
                    continue;
                }
            };

            self.observer.entry_visited(&path);
            stats.visited += 1;
            window.push(RawEntry::new(path, metadata));

            if window.len() >= window_size
                && !self.drain_window(&mut window, pool.as_ref(), cancel, &mut stats, &mut emit)
            {
                break;
            }
        }

        if !stats.cancelled {
            self.drain_window(&mut window, pool.as_ref(), cancel, &mut stats, &mut emit);
        }
        // A cancelled listing ends the iteration without an error
        stats.cancelled |= cancel.is_cancelled();

        debug!(
            root = %root.display(),
            visited = stats.visited,
            emitted = stats.emitted,
            warnings = stats.warnings,
            cancelled = stats.cancelled,
            "Traversal finished"
        );
        Ok(stats)
    }

    fn build_pool(&self) -> Result<Option<ThreadPool>, ScanError> {
        if self.workers <= 1 {
            return Ok(None);
        }
        ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("filecensus-hash-{i}"))
            .build()
            .map(Some)
            .map_err(|e| ScanError::WorkerPool {
                message: e.to_string(),
            })
    }

    /// Enrich and emit the buffered window. Returns `false` once the walk
    /// must stop.
    fn drain_window<F>(
        &self,
        window: &mut Vec<RawEntry>,
        pool: Option<&ThreadPool>,
        cancel: &CancellationToken,
        stats: &mut TraversalStats,
        emit: &mut F,
    ) -> bool
    where
        F: FnMut(FileRecord) -> bool,
    {
        if window.is_empty() {
            return true;
        }

        let entries = std::mem::take(window);
        let enriched: Vec<Enriched> = match pool {
            Some(pool) => pool.install(|| {
                entries
                    .into_par_iter()
                    .map(|entry| self.enricher.enrich(entry))
                    .collect()
            }),
            None => entries
                .into_iter()
                .map(|entry| self.enricher.enrich(entry))
                .collect(),
        };

        for Enriched { record, warning } in enriched {
            if let Some(warning) = warning {
                self.warn(stats, warning);
            }
            if cancel.is_cancelled() || !emit(record) {
                stats.cancelled = true;
                return false;
            }
            stats.emitted += 1;
        }

        true
    }

    fn warn(&self, stats: &mut TraversalStats, warning: ScanWarning) {
        stats.warnings += 1;
        self.observer.warning(&warning);
    }
}
