//! Unix targets without a birth-time field.

use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

use filecensus_core::{AttributeModel, AttributeStrategy, FileAttributes, FileTimes};

use super::unix_attributes;

/// Creation time falls back to the last metadata change (`st_ctime`).
#[derive(Debug, Default, Clone, Copy)]
pub struct ChangeTimeStrategy;

impl AttributeStrategy for ChangeTimeStrategy {
    fn model(&self) -> AttributeModel {
        AttributeModel::ChangeTime
    }

    fn extract(&self, name: &str, metadata: &Metadata) -> (FileTimes, FileAttributes) {
        let times = FileTimes::new(metadata.ctime(), metadata.mtime(), metadata.atime());
        (times, unix_attributes(name, metadata.mode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn test_creation_time_is_change_time() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.bin");
        fs::write(&path, b"abc").unwrap();
        let metadata = fs::symlink_metadata(&path).unwrap();

        let (times, attrs) = ChangeTimeStrategy.extract("data.bin", &metadata);
        assert_eq!(times.created, metadata.ctime());
        assert_eq!(times.modified, metadata.mtime());
        assert_eq!(times.accessed, metadata.atime());
        assert!(!attrs.hidden);
        assert!(!attrs.read_only);
        assert!(!attrs.system);
        assert!(!attrs.archive);
    }

    #[test]
    fn test_hidden_and_read_only() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".secret");
        fs::write(&path, b"x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();
        let metadata = fs::symlink_metadata(&path).unwrap();

        let (_, attrs) = ChangeTimeStrategy.extract(".secret", &metadata);
        assert!(attrs.hidden);
        assert!(attrs.read_only);
        assert_eq!(ChangeTimeStrategy.model(), AttributeModel::ChangeTime);
    }
}
