//! Content hashing for backup deduplication
//!
//! Digests are used purely as a content identity function: identical bytes
//! always yield an identical digest string, and any difference yields a
//! different one with overwhelming probability. Files are streamed in
//! bounded-size chunks so arbitrarily large logs never require full-file
//! buffering.

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Hash a file's content using SHA-256
///
/// Reads the file in 8KB chunks and returns the digest as a 64-character
/// lowercase hexadecimal string.
///
/// # Errors
///
/// Returns [`crate::MaplogError::Io`] if the file cannot be opened or read.
pub fn hash_file(path: &Path) -> Result<String> {
    debug!("Hashing {:?}", path);
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192]; // 8KB buffer

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let digest = hex::encode(hasher.finalize());
    debug!("Resulting digest: {}", digest);
    Ok(digest)
}

/// Hash arbitrary in-memory data using SHA-256
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_hash_determinism() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("map.log");
        fs::write(&path, b"entry data").unwrap();

        let first = hash_file(&path).unwrap();
        let second = hash_file(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64); // SHA-256 hex
    }

    #[test]
    fn test_single_byte_difference_changes_digest() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.log");
        let b = temp_dir.path().join("b.log");
        fs::write(&a, b"entry data").unwrap();
        fs::write(&b, b"entry datb").unwrap();

        assert_ne!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn test_file_and_data_digests_agree() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("map.log");
        fs::write(&path, b"same bytes").unwrap();

        assert_eq!(hash_file(&path).unwrap(), hash_data(b"same bytes"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = hash_file(&temp_dir.path().join("nope.log")).unwrap_err();
        assert!(matches!(err, crate::MaplogError::Io(_)));
    }
}
