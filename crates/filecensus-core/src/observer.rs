//! Catalog event reporting.
//!
//! Traversal warnings, flush progress and the final summary are delivered
//! through an injected [`CatalogObserver`] rather than a process-wide log
//! stream. [`TracingObserver`] forwards them to `tracing`;
//! [`CollectingObserver`] keeps them in memory.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use tracing::{info, trace, warn};

use crate::error::ScanWarning;

/// Progress snapshot taken at a flush boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushProgress {
    /// Records durably written so far.
    pub records_written: u64,
    /// 1-based index of this flush.
    pub flush_number: u64,
    /// Time since the sink started.
    pub elapsed: Duration,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogSummary {
    /// Records written to the output.
    pub records_written: u64,
    /// Flush events issued.
    pub flushes: u64,
    /// Non-fatal warnings raised by the traversal.
    pub warnings: u64,
    /// Sum of `size_bytes` over all records.
    pub bytes_cataloged: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl CatalogSummary {
    /// Records written per second.
    pub fn records_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.records_written as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Receives pipeline events. All methods default to no-ops.
pub trait CatalogObserver: Send + Sync {
    /// A non-fatal problem was handled at its point of occurrence.
    fn warning(&self, _warning: &ScanWarning) {}

    /// The traversal visited an entry.
    fn entry_visited(&self, _path: &Path) {}

    /// The sink completed a durable flush.
    fn flushed(&self, _progress: &FlushProgress) {}

    /// The run finished and the output was finalized.
    fn finished(&self, _summary: &CatalogSummary) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CatalogObserver for TracingObserver {
    fn warning(&self, warning: &ScanWarning) {
        warn!(kind = %warning.kind, path = %warning.path.display(), "{}", warning.message);
    }

    fn entry_visited(&self, path: &Path) {
        trace!(path = %path.display(), "visited");
    }

    fn flushed(&self, progress: &FlushProgress) {
        info!(
            flush = progress.flush_number,
            elapsed_ms = progress.elapsed.as_millis() as u64,
            "Processed {} files",
            progress.records_written
        );
    }

    fn finished(&self, summary: &CatalogSummary) {
        info!(
            flushes = summary.flushes,
            warnings = summary.warnings,
            bytes = summary.bytes_cataloged,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Successfully processed {} files",
            summary.records_written
        );
    }
}

/// One recorded pipeline event.
#[derive(Debug, Clone)]
pub enum CatalogEvent {
    Warning(ScanWarning),
    Visited(PathBuf),
    Flushed(FlushProgress),
    Finished(CatalogSummary),
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<CatalogEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far.
    pub fn events(&self) -> Vec<CatalogEvent> {
        self.lock().clone()
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> Vec<ScanWarning> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                CatalogEvent::Warning(w) => Some(w.clone()),
                _ => None,
            })
            .collect()
    }

    /// Paths visited so far.
    pub fn visited(&self) -> Vec<PathBuf> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                CatalogEvent::Visited(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    /// Flush progress events so far.
    pub fn flushes(&self) -> Vec<FlushProgress> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                CatalogEvent::Flushed(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// The final summary, if the run finished.
    pub fn summary(&self) -> Option<CatalogSummary> {
        self.lock().iter().find_map(|e| match e {
            CatalogEvent::Finished(s) => Some(*s),
            _ => None,
        })
    }

    fn push(&self, event: CatalogEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CatalogEvent>> {
        // A poisoned lock only means a panicking test thread; the events are still usable.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CatalogObserver for CollectingObserver {
    fn warning(&self, warning: &ScanWarning) {
        self.push(CatalogEvent::Warning(warning.clone()));
    }

    fn entry_visited(&self, path: &Path) {
        self.push(CatalogEvent::Visited(path.to_path_buf()));
    }

    fn flushed(&self, progress: &FlushProgress) {
        self.push(CatalogEvent::Flushed(*progress));
    }

    fn finished(&self, summary: &CatalogSummary) {
        self.push(CatalogEvent::Finished(*summary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WarningKind;

    #[test]
    fn test_collecting_observer_keeps_order() {
        let observer = CollectingObserver::new();
        observer.entry_visited(Path::new("/a"));
        observer.warning(&ScanWarning::new("/a/b", "nope", WarningKind::PathAccess));
        observer.entry_visited(Path::new("/a/c"));
        observer.flushed(&FlushProgress {
            records_written: 2,
            flush_number: 1,
            elapsed: Duration::ZERO,
        });

        assert_eq!(observer.visited(), vec![PathBuf::from("/a"), PathBuf::from("/a/c")]);
        assert_eq!(observer.warnings().len(), 1);
        assert_eq!(observer.flushes()[0].records_written, 2);
        assert!(observer.summary().is_none());
        assert_eq!(observer.events().len(), 4);
    }

    #[test]
    fn test_records_per_second() {
        let summary = CatalogSummary {
            records_written: 100,
            elapsed: Duration::from_secs(4),
            ..Default::default()
        };
        assert_eq!(summary.records_per_second(), 25.0);
        assert_eq!(CatalogSummary::default().records_per_second(), 0.0);
    }
}
