//! `ls -l` style mode strings.

use std::fs::Metadata;

use compact_str::CompactString;

const S_IFMT: u32 = 0o170000;
const S_IFSOCK: u32 = 0o140000;
const S_IFLNK: u32 = 0o120000;
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFDIR: u32 = 0o040000;
const S_IFCHR: u32 = 0o020000;
const S_IFIFO: u32 = 0o010000;

/// Render a raw `st_mode` as e.g. `drwxr-xr-x` or `-rwsr-xr-x`.
pub fn format_mode(mode: u32) -> CompactString {
    let type_char = match mode & S_IFMT {
        S_IFDIR => 'd',
        S_IFLNK => 'l',
        S_IFIFO => 'p',
        S_IFSOCK => 's',
        S_IFCHR => 'c',
        S_IFBLK => 'b',
        _ => '-',
    };

    let mut out = CompactString::with_capacity(10);
    out.push(type_char);

    // (shift, special bit, special char) for owner, group, other
    for (shift, special, special_char) in [(6, 0o4000, 's'), (3, 0o2000, 's'), (0, 0o1000, 't')] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(match (mode & special != 0, bits & 0o1 != 0) {
            (true, true) => special_char,
            (true, false) => special_char.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }

    out
}

/// Synthesize a mode for platforms that only expose a read-only flag.
pub fn synthesized_mode(is_dir: bool, is_symlink: bool, read_only: bool) -> u32 {
    let mut perm = if read_only { 0o444 } else { 0o666 };
    let type_bits = if is_symlink {
        perm = 0o777;
        S_IFLNK
    } else if is_dir {
        perm |= 0o111;
        S_IFDIR
    } else {
        S_IFREG
    };
    type_bits | perm
}

/// Mode string for an entry's (non-following) metadata.
#[cfg(unix)]
pub fn mode_string(metadata: &Metadata) -> CompactString {
    use std::os::unix::fs::PermissionsExt;
    format_mode(metadata.permissions().mode())
}

/// Mode string for an entry's (non-following) metadata.
#[cfg(not(unix))]
pub fn mode_string(metadata: &Metadata) -> CompactString {
    let file_type = metadata.file_type();
    format_mode(synthesized_mode(
        file_type.is_dir(),
        file_type.is_symlink(),
        metadata.permissions().readonly(),
    ))
}
