//! Timestamp and attribute-flag contract shared by every platform.
//!
//! Each target OS exposes a different stat layout (birth time, change time,
//! or native attribute bits). The scanner picks exactly one
//! [`AttributeStrategy`] for the build target; everything downstream only
//! ever sees [`FileTimes`] and [`FileAttributes`].

use std::fs::Metadata;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Entry timestamps, normalized to UTC epoch seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTimes {
    /// Creation time (birth time, or the platform's closest substitute).
    pub created: i64,
    /// Last content modification time.
    pub modified: i64,
    /// Last access time.
    pub accessed: i64,
}

impl FileTimes {
    /// Create timestamps from epoch seconds.
    pub fn new(created: i64, modified: i64, accessed: i64) -> Self {
        Self {
            created,
            modified,
            accessed,
        }
    }

    /// Create timestamps from `SystemTime` values.
    pub fn from_system_times(created: SystemTime, modified: SystemTime, accessed: SystemTime) -> Self {
        Self {
            created: epoch_seconds(created),
            modified: epoch_seconds(modified),
            accessed: epoch_seconds(accessed),
        }
    }
}

/// Convert a `SystemTime` to whole UTC seconds since the Unix epoch.
///
/// Times before the epoch yield negative values.
pub fn epoch_seconds(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp()
}

/// Hidden/system/archive/read-only flags of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttributes {
    pub hidden: bool,
    pub system: bool,
    pub archive: bool,
    pub read_only: bool,
}

/// The attribute model a strategy implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
pub enum AttributeModel {
    /// Creation time read from a native birth-time field.
    BirthTime,
    /// No birth time; creation falls back to the metadata-change time.
    ChangeTime,
    /// Times and flags read from native attribute bits.
    AttributeBits,
}

/// Extracts timestamps and attribute flags from a raw directory entry.
///
/// Implementations are selected once per build target and must not inspect
/// anything beyond the entry name and its (non-following) metadata.
pub trait AttributeStrategy: Send + Sync {
    /// Which attribute model this strategy implements.
    fn model(&self) -> AttributeModel;

    /// Extract times and flags for the entry called `name`.
    fn extract(&self, name: &str, metadata: &Metadata) -> (FileTimes, FileAttributes);
}

impl<T: AttributeStrategy + ?Sized> AttributeStrategy for &T {
    fn model(&self) -> AttributeModel {
        (**self).model()
    }

    fn extract(&self, name: &str, metadata: &Metadata) -> (FileTimes, FileAttributes) {
        (**self).extract(name, metadata)
    }
}
