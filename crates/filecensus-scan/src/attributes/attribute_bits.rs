//! Windows: times and flags come straight from the native attribute data.

#[cfg(windows)]
use std::fs::Metadata;

#[cfg(windows)]
use filecensus_core::{AttributeModel, AttributeStrategy, FileTimes};
use filecensus_core::FileAttributes;

pub const FILE_ATTRIBUTE_READONLY: u32 = 0x0000_0001;
pub const FILE_ATTRIBUTE_HIDDEN: u32 = 0x0000_0002;
pub const FILE_ATTRIBUTE_SYSTEM: u32 = 0x0000_0004;
pub const FILE_ATTRIBUTE_ARCHIVE: u32 = 0x0000_0020;

/// 100ns intervals between 1601-01-01 and 1970-01-01.
const FILETIME_UNIX_OFFSET: u64 = 116_444_736_000_000_000;
const FILETIME_TICKS_PER_SECOND: u64 = 10_000_000;

/// Convert a FILETIME (100ns ticks since 1601, UTC) to Unix seconds.
pub fn filetime_to_unix_seconds(filetime: u64) -> i64 {
    if filetime >= FILETIME_UNIX_OFFSET {
        ((filetime - FILETIME_UNIX_OFFSET) / FILETIME_TICKS_PER_SECOND) as i64
    } else {
        // Round toward negative infinity for pre-1970 times
        let before = FILETIME_UNIX_OFFSET - filetime;
        -(before.div_ceil(FILETIME_TICKS_PER_SECOND) as i64)
    }
}

/// Decode `dwFileAttributes` into flags.
pub fn decode_attribute_bits(bits: u32) -> FileAttributes {
    FileAttributes {
        hidden: bits & FILE_ATTRIBUTE_HIDDEN != 0,
        system: bits & FILE_ATTRIBUTE_SYSTEM != 0,
        archive: bits & FILE_ATTRIBUTE_ARCHIVE != 0,
        read_only: bits & FILE_ATTRIBUTE_READONLY != 0,
    }
}

/// Reads `ftCreationTime`, `ftLastWriteTime`, `ftLastAccessTime` and
/// `dwFileAttributes`.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct AttributeBitsStrategy;

#[cfg(windows)]
impl AttributeStrategy for AttributeBitsStrategy {
    fn model(&self) -> AttributeModel {
        AttributeModel::AttributeBits
    }

    fn extract(&self, _name: &str, metadata: &Metadata) -> (FileTimes, FileAttributes) {
        use std::os::windows::fs::MetadataExt;

        let times = FileTimes::new(
            filetime_to_unix_seconds(metadata.creation_time()),
            filetime_to_unix_seconds(metadata.last_write_time()),
            filetime_to_unix_seconds(metadata.last_access_time()),
        );
        (times, decode_attribute_bits(metadata.file_attributes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filetime_epoch() {
        assert_eq!(filetime_to_unix_seconds(FILETIME_UNIX_OFFSET), 0);
        assert_eq!(
            filetime_to_unix_seconds(FILETIME_UNIX_OFFSET + 1_700_000_000 * FILETIME_TICKS_PER_SECOND),
            1_700_000_000
        );
        // Sub-second ticks truncate
        assert_eq!(filetime_to_unix_seconds(FILETIME_UNIX_OFFSET + 9_999_999), 0);
    }

    #[test]
    fn test_filetime_before_unix_epoch() {
        assert_eq!(filetime_to_unix_seconds(FILETIME_UNIX_OFFSET - FILETIME_TICKS_PER_SECOND), -1);
        assert_eq!(filetime_to_unix_seconds(FILETIME_UNIX_OFFSET - 1), -1);
        assert_eq!(filetime_to_unix_seconds(0), -11_644_473_600);
    }

    #[test]
    fn test_decode_attribute_bits() {
        let attrs = decode_attribute_bits(FILE_ATTRIBUTE_HIDDEN | FILE_ATTRIBUTE_SYSTEM);
        assert!(attrs.hidden);
        assert!(attrs.system);
        assert!(!attrs.archive);
        assert!(!attrs.read_only);

        let attrs = decode_attribute_bits(FILE_ATTRIBUTE_ARCHIVE | FILE_ATTRIBUTE_READONLY | 0x80);
        assert!(!attrs.hidden);
        assert!(attrs.archive);
        assert!(attrs.read_only);

        assert_eq!(decode_attribute_bits(0), FileAttributes::default());
    }
}
