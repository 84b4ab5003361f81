//! Per-platform attribute extraction.
//!
//! Exactly one strategy is compiled in as [`NativeAttributes`]:
//!
//! | target | strategy | creation time |
//! |---|---|---|
//! | macOS, iOS, FreeBSD, NetBSD | [`BirthTimeStrategy`] | `st_birthtime` |
//! | other Unix (Linux, ...) | [`ChangeTimeStrategy`] | `st_ctime` |
//! | Windows | [`AttributeBitsStrategy`] | `ftCreationTime` |
//!
//! The decoding helpers are plain functions so every variant's rules can be
//! exercised on any host.

mod attribute_bits;
#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd", target_os = "netbsd"))]
mod birth_time;
#[cfg(unix)]
mod change_time;

#[cfg(windows)]
pub use attribute_bits::AttributeBitsStrategy;
pub use attribute_bits::{
    FILE_ATTRIBUTE_ARCHIVE, FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_READONLY, FILE_ATTRIBUTE_SYSTEM,
    decode_attribute_bits, filetime_to_unix_seconds,
};
#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd", target_os = "netbsd"))]
pub use birth_time::BirthTimeStrategy;
#[cfg(unix)]
pub use change_time::ChangeTimeStrategy;

use filecensus_core::FileAttributes;

/// Strategy for the build target.
#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd", target_os = "netbsd"))]
pub type NativeAttributes = BirthTimeStrategy;

/// Strategy for the build target.
#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "ios", target_os = "freebsd", target_os = "netbsd"))
))]
pub type NativeAttributes = ChangeTimeStrategy;

/// Strategy for the build target.
#[cfg(windows)]
pub type NativeAttributes = AttributeBitsStrategy;

/// Unix convention: a leading dot hides the entry.
pub fn is_dot_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Flags derived from a Unix name and permission bits.
///
/// Read-only means the owner write bit is clear. Unix has no system or
/// archive attribute, so both are always false.
pub fn unix_attributes(name: &str, mode: u32) -> FileAttributes {
    FileAttributes {
        hidden: is_dot_hidden(name),
        system: false,
        archive: false,
        read_only: mode & 0o200 == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_hidden() {
        assert!(is_dot_hidden(".git"));
        assert!(is_dot_hidden(".."));
        assert!(!is_dot_hidden("src"));
        assert!(!is_dot_hidden(""));
    }

    #[test]
    fn test_unix_attributes() {
        let attrs = unix_attributes(".env", 0o100644);
        assert!(attrs.hidden);
        assert!(!attrs.read_only);
        assert!(!attrs.system);
        assert!(!attrs.archive);

        let attrs = unix_attributes("report.pdf", 0o100444);
        assert!(!attrs.hidden);
        assert!(attrs.read_only);

        // Group/other write bits do not count
        assert!(unix_attributes("shared", 0o100466).read_only);
    }
}
