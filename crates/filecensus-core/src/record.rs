//! Catalog record types.

use std::fs::FileType;
use std::path::Path;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::attributes::{FileAttributes, FileTimes};

/// SHA-256 content digest of a regular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Length of the lowercase hex encoding.
    pub const HEX_LEN: usize = 64;

    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Type of a visited entry, taken from non-following metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (never followed).
    Symlink,
    /// Sockets, devices, FIFOs.
    Other,
}

impl EntryKind {
    /// Classify an lstat file type.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::Symlink)
    }
}

/// Immutable snapshot of one filesystem entry at visit time.
///
/// Construction enforces the record invariants: directories carry a zero
/// size, and only regular files can carry a content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    path: String,
    name: CompactString,
    directory: String,
    size_bytes: i64,
    times: FileTimes,
    mode: CompactString,
    kind: EntryKind,
    attributes: FileAttributes,
    extension: CompactString,
    content_hash: Option<ContentHash>,
    batch_tag: String,
}

impl FileRecord {
    /// Start a record for `path`. Name, parent directory and extension are
    /// derived from the path as visited.
    pub fn new(path: &Path, kind: EntryKind, size: u64, batch_tag: impl Into<String>) -> Self {
        let name = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_else(|| CompactString::new(path.to_string_lossy()));
        let directory = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Suffix from the last dot of the final component, dot included
        let extension = name
            .rfind('.')
            .map(|i| CompactString::new(&name[i..]))
            .unwrap_or_default();
        let size_bytes = if kind.is_dir() {
            0
        } else {
            i64::try_from(size).unwrap_or(i64::MAX)
        };

        Self {
            path: path.to_string_lossy().into_owned(),
            name,
            directory,
            size_bytes,
            times: FileTimes::default(),
            mode: CompactString::default(),
            kind,
            attributes: FileAttributes::default(),
            extension,
            content_hash: None,
            batch_tag: batch_tag.into(),
        }
    }

    /// Set the entry timestamps.
    pub fn with_times(mut self, times: FileTimes) -> Self {
        self.times = times;
        self
    }

    /// Set the attribute flags.
    pub fn with_attributes(mut self, attributes: FileAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the human-readable mode string.
    pub fn with_mode(mut self, mode: impl Into<CompactString>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Attach a content hash. Ignored unless the entry is a regular file.
    pub fn with_content_hash(mut self, hash: ContentHash) -> Self {
        if self.kind.is_file() {
            self.content_hash = Some(hash);
        }
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn size_bytes(&self) -> i64 {
        self.size_bytes
    }

    pub fn times(&self) -> FileTimes {
        self.times
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    pub fn is_symlink(&self) -> bool {
        self.kind.is_symlink()
    }

    pub fn attributes(&self) -> FileAttributes {
        self.attributes
    }

    /// Extension including its leading dot, or empty.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn content_hash(&self) -> Option<&ContentHash> {
        self.content_hash.as_ref()
    }

    /// Lowercase hex digest, if the file was hashed.
    pub fn content_hash_hex(&self) -> Option<String> {
        self.content_hash.map(|h| h.to_hex())
    }

    /// Identifies the output unit this record is destined for.
    pub fn batch_tag(&self) -> &str {
        &self.batch_tag
    }
}
