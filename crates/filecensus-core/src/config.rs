//! Catalog run configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "file_metadata.parquet";
/// Default bounded-queue capacity.
pub const DEFAULT_BUFFER_SIZE: usize = 1000;
/// Default hash worker count.
pub const DEFAULT_WORKERS: usize = 4;
/// Default number of records per durable flush.
pub const DEFAULT_FLUSH_SIZE: usize = 10_000;
/// Default in-progress row group threshold (128 MiB).
pub const DEFAULT_ROW_GROUP_BYTES: usize = 128 * 1024 * 1024;

/// Configuration for one catalog run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate", error = "ScanError"))]
pub struct CatalogConfig {
    /// Root path to catalog.
    pub root: PathBuf,

    /// Destination of the columnar file.
    #[builder(default = "PathBuf::from(DEFAULT_OUTPUT)")]
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Capacity of the queue between traversal and sink.
    #[builder(default = "DEFAULT_BUFFER_SIZE")]
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Parallelism hint; sizes the hashing worker pool (1 = sequential).
    #[builder(default = "DEFAULT_WORKERS")]
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Records per durable flush.
    #[builder(default = "DEFAULT_FLUSH_SIZE")]
    #[serde(default = "default_flush_size")]
    pub flush_size: usize,

    /// Buffered bytes at which the writer closes a row group on its own.
    #[builder(default = "DEFAULT_ROW_GROUP_BYTES")]
    #[serde(default = "default_row_group_bytes")]
    pub row_group_bytes: usize,

    /// Tag stamped on every record (defaults to the output path).
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub batch_tag: Option<String>,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_flush_size() -> usize {
    DEFAULT_FLUSH_SIZE
}

fn default_row_group_bytes() -> usize {
    DEFAULT_ROW_GROUP_BYTES
}

impl From<derive_builder::UninitializedFieldError> for ScanError {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        ScanError::InvalidConfig {
            message: format!("{} is required", err.field_name()),
        }
    }
}

impl From<String> for ScanError {
    fn from(message: String) -> Self {
        ScanError::InvalidConfig { message }
    }
}

impl CatalogConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root directory cannot be empty".to_string());
            }
            Some(_) => {}
            None => return Err("Root directory is required".to_string()),
        }
        if self.buffer_size == Some(0) {
            return Err("Buffer size must be at least 1".to_string());
        }
        if self.flush_size == Some(0) {
            return Err("Flush size must be at least 1".to_string());
        }
        if self.workers == Some(0) {
            return Err("Worker count must be at least 1".to_string());
        }
        if self.row_group_bytes == Some(0) {
            return Err("Row group size must be at least 1 byte".to_string());
        }
        Ok(())
    }
}

impl CatalogConfig {
    /// Create a new config builder.
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }

    /// Create a config with defaults for everything but the root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output: default_output(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            workers: DEFAULT_WORKERS,
            flush_size: DEFAULT_FLUSH_SIZE,
            row_group_bytes: DEFAULT_ROW_GROUP_BYTES,
            batch_tag: None,
        }
    }

    /// Tag stamped on every record of this run.
    pub fn batch_tag(&self) -> String {
        self.batch_tag
            .clone()
            .unwrap_or_else(|| self.output.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = CatalogConfig::builder().root("/srv/data").build().unwrap();

        assert_eq!(config.root, PathBuf::from("/srv/data"));
        assert_eq!(config.output, PathBuf::from("file_metadata.parquet"));
        assert_eq!(config.buffer_size, 1000);
        assert_eq!(config.workers, 4);
        assert_eq!(config.flush_size, 10_000);
        assert_eq!(config.row_group_bytes, 128 * 1024 * 1024);
        assert_eq!(config.batch_tag(), "file_metadata.parquet");
    }

    #[test]
    fn test_config_builder_overrides() {
        let config = CatalogConfig::builder()
            .root("/srv/data")
            .output("/tmp/inv.parquet")
            .buffer_size(16usize)
            .workers(1usize)
            .flush_size(100usize)
            .batch_tag("nightly")
            .build()
            .unwrap();

        assert_eq!(config.buffer_size, 16);
        assert_eq!(config.workers, 1);
        assert_eq!(config.flush_size, 100);
        assert_eq!(config.batch_tag(), "nightly");
    }

    #[test]
    fn test_missing_root_is_config_error() {
        let err = CatalogConfig::builder().build().unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig { .. }));
        assert!(err.to_string().contains("Root directory is required"));
    }

    #[test]
    fn test_empty_root_rejected() {
        let err = CatalogConfig::builder().root("").build().unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig { .. }));
    }

    #[test]
    fn test_zero_sizes_rejected() {
        for builder in [
            CatalogConfig::builder().root("/r").buffer_size(0usize).clone(),
            CatalogConfig::builder().root("/r").flush_size(0usize).clone(),
            CatalogConfig::builder().root("/r").workers(0usize).clone(),
        ] {
            assert!(matches!(builder.build(), Err(ScanError::InvalidConfig { .. })));
        }
    }

    #[test]
    fn test_batch_tag_follows_output() {
        let mut config = CatalogConfig::new("/r");
        config.output = PathBuf::from("runs/2024.parquet");
        assert_eq!(config.batch_tag(), "runs/2024.parquet");
    }
}
