//! Unix targets with a native birth-time field.

use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

use filecensus_core::{AttributeModel, AttributeStrategy, FileAttributes, FileTimes, epoch_seconds};

use super::unix_attributes;

/// Creation time read from `st_birthtime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BirthTimeStrategy;

impl AttributeStrategy for BirthTimeStrategy {
    fn model(&self) -> AttributeModel {
        AttributeModel::BirthTime
    }

    fn extract(&self, name: &str, metadata: &Metadata) -> (FileTimes, FileAttributes) {
        // std reads st_birthtime here; filesystems that do not record it report an error
        let created = metadata
            .created()
            .map(epoch_seconds)
            .unwrap_or_else(|_| metadata.ctime());
        let times = FileTimes::new(created, metadata.mtime(), metadata.atime());
        (times, unix_attributes(name, metadata.mode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_birth_time_not_after_modification() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".hidden");
        fs::write(&path, b"abc").unwrap();
        let metadata = fs::symlink_metadata(&path).unwrap();

        let (times, attrs) = BirthTimeStrategy.extract(".hidden", &metadata);
        assert!(times.created <= times.modified);
        assert_eq!(times.modified, metadata.mtime());
        assert!(attrs.hidden);
        assert!(!attrs.system);
        assert!(!attrs.archive);
    }
}
