//! Full-content SHA-256 hashing.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use filecensus_core::ContentHash;

const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Streams file contents through SHA-256.
///
/// A hash is either computed over every byte of the file or not at all: any
/// open or read error discards the partial state and is returned to the
/// caller.
#[derive(Debug, Clone)]
pub struct ContentHasher {
    buffer_size: usize,
}

impl ContentHasher {
    /// Create a hasher with the default 64 KiB read buffer.
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Create a hasher with a custom read buffer size.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Hash the regular file at `path`.
    pub fn hash_file(&self, path: &Path) -> io::Result<ContentHash> {
        let file = File::open(path)?;
        self.hash_reader(file)
    }

    /// Hash everything `reader` yields until EOF.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<ContentHash> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Ok(ContentHash::new(digest))
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}
