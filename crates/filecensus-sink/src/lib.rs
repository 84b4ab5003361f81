//! Output side of filecensus.
//!
//! - [`RecordWriter`]: the append / flush / finish contract of the columnar
//!   target, with [`ParquetRecordWriter`] as the production implementation
//! - [`Sink`]: batches records and issues a durable flush every
//!   `flush_size` records
//! - [`Catalog`]: joins the traversal and the sink through a bounded queue,
//!   propagating sink failures back to the producer as cancellation
//!
//! # Example
//!
//! ```rust,no_run
//! use filecensus_sink::{Catalog, CatalogConfig};
//!
//! let config = CatalogConfig::builder()
//!     .root("/srv/data")
//!     .output("inventory.parquet")
//!     .build()
//!     .unwrap();
//!
//! let summary = Catalog::new(config).run().unwrap();
//! println!("Cataloged {} entries", summary.records_written);
//! ```

mod columnar;
mod error;
mod pipeline;
mod sink;
mod writer;

pub use columnar::{COLUMNS, ParquetRecordWriter, catalog_schema};
pub use error::CatalogError;
pub use pipeline::Catalog;
pub use sink::{Sink, SinkSummary};
pub use writer::{RecordWriter, WriterError};

// Re-export core types for convenience
pub use filecensus_core::{
    CatalogConfig, CatalogConfigBuilder, CatalogObserver, CatalogSummary, CollectingObserver,
    FileRecord, FlushProgress, ScanError, ScanWarning, TracingObserver, WarningKind,
};
