//! File system traversal engine for filecensus.
//!
//! This crate walks a directory tree and turns every visited entry into an
//! immutable [`FileRecord`]:
//!
//! - **Pre-order traversal** via jwalk (a directory precedes its children,
//!   siblings sorted by name, symlinks never followed)
//! - **Per-platform attributes** through a single [`AttributeStrategy`]
//!   compiled in for the target ([`NativeAttributes`])
//! - **SHA-256 content hashes** for regular files ([`ContentHasher`])
//! - **Backpressure** by pushing into a bounded tokio channel, with a
//!   `CancellationToken` checked before every push and every descent
//!
//! Per-entry failures never abort the walk; they are reported through the
//! injected [`CatalogObserver`] and the affected entry is skipped or emitted
//! without a hash.
//!
//! # Example
//!
//! ```rust,no_run
//! use filecensus_scan::Traverser;
//! use tokio_util::sync::CancellationToken;
//!
//! let traverser = Traverser::new("inventory.parquet").workers(4);
//! let stats = traverser
//!     .walk("/srv/data".as_ref(), &CancellationToken::new(), |record| {
//!         println!("{} {:?}", record.path(), record.content_hash_hex());
//!         true
//!     })
//!     .unwrap();
//!
//! println!("Visited {} entries", stats.visited);
//! ```

pub mod attributes;
mod enrich;
mod hasher;
mod mode;
mod traverser;

pub use attributes::NativeAttributes;
pub use enrich::{Enriched, Enricher, RawEntry};
pub use hasher::ContentHasher;
pub use mode::{format_mode, mode_string, synthesized_mode};
pub use traverser::{TraversalStats, Traverser};

// Re-export core types for convenience
pub use filecensus_core::{
    AttributeModel, AttributeStrategy, CatalogObserver, ContentHash, FileAttributes, FileRecord,
    FileTimes, ScanError, ScanWarning, WarningKind,
};
