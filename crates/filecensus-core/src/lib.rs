//! Core types and traits for filecensus.
//!
//! This crate provides the data model shared by the scanner and the sink:
//! the immutable [`FileRecord`], the [`AttributeStrategy`] capability that
//! hides per-platform stat layouts, the run configuration, the error
//! taxonomy and the [`CatalogObserver`] event interface.

mod attributes;
mod config;
mod error;
mod observer;
mod record;

pub use attributes::{AttributeModel, AttributeStrategy, FileAttributes, FileTimes, epoch_seconds};
pub use config::{
    CatalogConfig, CatalogConfigBuilder, DEFAULT_BUFFER_SIZE, DEFAULT_FLUSH_SIZE, DEFAULT_OUTPUT,
    DEFAULT_ROW_GROUP_BYTES, DEFAULT_WORKERS,
};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use observer::{
    CatalogEvent, CatalogObserver, CatalogSummary, CollectingObserver, FlushProgress,
    TracingObserver,
};
pub use record::{ContentHash, EntryKind, FileRecord};
