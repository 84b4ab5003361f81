//! Turns a visited (path, metadata) pair into a [`FileRecord`].

use std::fs::Metadata;
use std::path::PathBuf;

use filecensus_core::{AttributeStrategy, EntryKind, FileRecord, ScanWarning};

use crate::hasher::ContentHasher;
use crate::mode::mode_string;

/// A visited entry before enrichment.
#[derive(Debug)]
pub struct RawEntry {
    pub path: PathBuf,
    pub metadata: Metadata,
}

impl RawEntry {
    pub fn new(path: PathBuf, metadata: Metadata) -> Self {
        Self { path, metadata }
    }
}

/// Outcome of enriching one entry.
#[derive(Debug)]
pub struct Enriched {
    pub record: FileRecord,
    /// Set when the file could not be hashed.
    pub warning: Option<ScanWarning>,
}

/// Applies the attribute strategy and the hasher to raw entries.
#[derive(Debug)]
pub struct Enricher<A> {
    strategy: A,
    hasher: ContentHasher,
    batch_tag: String,
}

impl<A: AttributeStrategy> Enricher<A> {
    pub fn new(strategy: A, hasher: ContentHasher, batch_tag: impl Into<String>) -> Self {
        Self {
            strategy,
            hasher,
            batch_tag: batch_tag.into(),
        }
    }

    /// Replace the content hasher.
    pub fn with_hasher(mut self, hasher: ContentHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn strategy(&self) -> &A {
        &self.strategy
    }

    /// Build the record for `entry`.
    ///
    /// Only regular files are hashed. Symlinks are leaves and are never
    /// followed, so they carry no hash.
    pub fn enrich(&self, entry: RawEntry) -> Enriched {
        let RawEntry { path, metadata } = entry;
        let kind = EntryKind::from_file_type(metadata.file_type());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let (times, attributes) = self.strategy.extract(&name, &metadata);

        let record = FileRecord::new(&path, kind, metadata.len(), self.batch_tag.as_str())
            .with_times(times)
            .with_attributes(attributes)
            .with_mode(mode_string(&metadata));

        if !kind.is_file() {
            return Enriched {
                record,
                warning: None,
            };
        }

        match self.hasher.hash_file(&path) {
            Ok(hash) => Enriched {
                record: record.with_content_hash(hash),
                warning: None,
            },
            Err(err) => Enriched {
                warning: Some(ScanWarning::hash_unavailable(&path, &err)),
                record,
            },
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::attributes::ChangeTimeStrategy;
    use std::fs;
    use std::os::unix::fs::{PermissionsExt, symlink};
    use tempfile::TempDir;

    fn enricher() -> Enricher<ChangeTimeStrategy> {
        Enricher::new(ChangeTimeStrategy, ContentHasher::new(), "test.parquet")
    }

    fn raw(path: PathBuf) -> RawEntry {
        let metadata = fs::symlink_metadata(&path).unwrap();
        RawEntry::new(path, metadata)
    }

    #[test]
    fn test_file_record_is_hashed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        let enriched = enricher().enrich(raw(path));
        assert!(enriched.warning.is_none());
        let record = enriched.record;
        assert!(record.is_file());
        assert!(!record.is_directory());
        assert_eq!(record.size_bytes(), 5);
        assert_eq!(record.extension(), ".txt");
        assert_eq!(record.batch_tag(), "test.parquet");
        assert!(record.mode().starts_with('-'));
        assert_eq!(
            record.content_hash_hex().as_deref(),
            Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );
    }

    #[test]
    fn test_directory_record_has_no_hash() {
        let temp = TempDir::new().unwrap();
        let enriched = enricher().enrich(raw(temp.path().to_path_buf()));

        assert!(enriched.warning.is_none());
        assert!(enriched.record.is_directory());
        assert_eq!(enriched.record.size_bytes(), 0);
        assert!(enriched.record.content_hash().is_none());
        assert!(enriched.record.mode().starts_with('d'));
    }

    #[test]
    fn test_symlink_is_not_followed_or_hashed() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target.txt");
        let link = temp.path().join("link.txt");
        fs::write(&target, "hello").unwrap();
        symlink(&target, &link).unwrap();

        let enriched = enricher().enrich(raw(link));
        assert!(enriched.warning.is_none());
        assert!(enriched.record.is_symlink());
        assert!(!enriched.record.is_file());
        assert!(enriched.record.content_hash().is_none());
        assert!(enriched.record.mode().starts_with('l'));
    }

    #[test]
    fn test_unreadable_file_keeps_metadata() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("locked.bin");
        fs::write(&path, "secret").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::File::open(&path).is_ok() {
            // Privileged users bypass permission bits
            return;
        }

        let enriched = enricher().enrich(raw(path.clone()));
        let warning = enriched.warning.expect("hash warning");
        assert_eq!(warning.kind, filecensus_core::WarningKind::HashUnavailable);
        assert_eq!(warning.path, path);
        assert!(enriched.record.is_file());
        assert_eq!(enriched.record.size_bytes(), 6);
        assert!(enriched.record.times().modified > 0);
        assert!(enriched.record.content_hash().is_none());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    }
}
