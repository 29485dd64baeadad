//! Streaming SHA-256 content hashing.
//!
//! Every digest in a lineage document is a lowercase hex SHA-256 string.
//! Files are read in fixed-size chunks so memory use does not grow with the
//! size of the archive or image being hashed.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest as _, Sha256};

use crate::errors::LineageError;

/// Default read size when hashing files (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_LEN: usize = 64;

/// Hash everything `reader` yields, `chunk_size` bytes at a time.
///
/// # Errors
///
/// Propagates read errors from `reader`.
pub fn hash_reader<R: Read>(mut reader: R, chunk_size: usize) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; chunk_size.max(1)];

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Hash the contents of the file at `path`.
///
/// # Errors
///
/// Returns [`LineageError::NotFound`] if the file does not exist and
/// [`LineageError::Io`] for any other read failure.
pub fn hash_file(path: &Path, chunk_size: usize) -> Result<String, LineageError> {
    let file = File::open(path).map_err(|error| LineageError::from_io(path, error))?;
    let digest = hash_reader(file, chunk_size).map_err(|error| LineageError::from_io(path, error))?;
    tracing::debug!(path = %path.display(), %digest, "hashed file");
    Ok(digest)
}

/// Hash the UTF-8 bytes of `value`.
#[must_use]
pub fn hash_str(value: &str) -> String {
    format!("{:x}", Sha256::digest(value.as_bytes()))
}

/// Whether `value` has the shape of a hex SHA-256 digest.
#[must_use]
pub fn is_digest(value: &str) -> bool {
    value.len() == DIGEST_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
