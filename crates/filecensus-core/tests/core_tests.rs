use filecensus_core::{
    CatalogConfig, ContentHash, EntryKind, FileAttributes, FileRecord, FileTimes, ScanError,
    ScanWarning, WarningKind, epoch_seconds,
};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};
use tempfile::TempDir;

#[test]
fn test_content_hash_creation_and_hex() {
    let bytes = [0xab; 32];
    let hash = ContentHash::new(bytes);

    let hex = hash.to_hex();
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(hex.starts_with("ab"));

    assert_eq!(hash, ContentHash::new(bytes));
    assert_ne!(hash, ContentHash::new([0xcd; 32]));
}

#[test]
fn test_file_times_from_system_times() {
    let created = UNIX_EPOCH + Duration::from_secs(1_000);
    let modified = UNIX_EPOCH + Duration::from_secs(2_000);
    let accessed = UNIX_EPOCH + Duration::from_secs(3_000);

    let times = FileTimes::from_system_times(created, modified, accessed);
    assert_eq!(times, FileTimes::new(1_000, 2_000, 3_000));
    assert_eq!(epoch_seconds(accessed), 3_000);
}

#[test]
fn test_entry_kind_discrimination() {
    assert!(EntryKind::File.is_file());
    assert!(!EntryKind::File.is_dir());
    assert!(EntryKind::Directory.is_dir());
    assert!(EntryKind::Symlink.is_symlink());
    assert!(!EntryKind::Symlink.is_file());

    let other = EntryKind::Other;
    assert!(!other.is_file());
    assert!(!other.is_dir());
    assert!(!other.is_symlink());
}

#[test]
fn test_entry_kind_from_file_type() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("f.txt");
    std::fs::write(&file, "x").unwrap();

    let dir_type = std::fs::symlink_metadata(temp.path()).unwrap().file_type();
    let file_type = std::fs::symlink_metadata(&file).unwrap().file_type();
    assert_eq!(EntryKind::from_file_type(dir_type), EntryKind::Directory);
    assert_eq!(EntryKind::from_file_type(file_type), EntryKind::File);
}

#[test]
fn test_record_type_flags_are_exclusive() {
    for kind in [EntryKind::File, EntryKind::Directory, EntryKind::Symlink, EntryKind::Other] {
        let record = FileRecord::new(Path::new("/x/y"), kind, 10, "tag");
        assert!(!(record.is_file() && record.is_directory()));
    }
}

#[test]
fn test_record_carries_times_attributes_and_mode() {
    let attrs = FileAttributes {
        hidden: true,
        read_only: true,
        ..Default::default()
    };
    let record = FileRecord::new(Path::new("/home/u/.profile"), EntryKind::File, 220, "scan.parquet")
        .with_times(FileTimes::new(1, 2, 3))
        .with_attributes(attrs)
        .with_mode("-r--r--r--");

    assert_eq!(record.name(), ".profile");
    assert_eq!(record.times().created, 1);
    assert_eq!(record.times().modified, 2);
    assert_eq!(record.times().accessed, 3);
    assert!(record.attributes().hidden);
    assert!(!record.attributes().system);
    assert!(record.attributes().read_only);
    assert_eq!(record.mode(), "-r--r--r--");
    assert!(record.content_hash().is_none());
}

#[test]
fn test_config_and_errors() {
    let config = CatalogConfig::new("/data");
    assert_eq!(config.flush_size, 10_000);
    assert_eq!(config.buffer_size, 1000);

    let err = CatalogConfig::builder().output("x.parquet").build().unwrap_err();
    assert!(matches!(err, ScanError::InvalidConfig { .. }));

    let warning = ScanWarning::path_access("/locked", "Permission denied");
    assert_eq!(warning.kind, WarningKind::PathAccess);
    assert!(warning.message.contains("/locked"));
}
