//! Binary map log serialization
//!
//! A log file is an 8-byte magic header followed by the bincode-encoded
//! entry vector. Reading re-establishes the order-key invariant by sorting;
//! writing is atomic (temp file then rename) so no partially written log is
//! ever visible at the destination path.

use crate::error::{MaplogError, Result};
use crate::types::Entry;
use std::fs;
use std::path::Path;
use tracing::info;

/// Log file magic header: format name plus a one-byte version
const MAGIC: &[u8; 8] = b"MAPLOG\x00\x01";

/// Read all entries from the log at `path`, sorted by order key ascending
///
/// # Errors
///
/// - [`MaplogError::MissingFile`] if `path` does not exist
/// - [`MaplogError::InvalidLog`] on a bad magic header or trailing bytes
/// - [`MaplogError::Bincode`] if the entry records fail to decode
pub fn read_log(path: &Path) -> Result<Vec<Entry>> {
    if !path.exists() {
        return Err(MaplogError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    info!("Loading {:?}", path);

    let bytes = fs::read(path)?;
    let body = bytes
        .strip_prefix(&MAGIC[..])
        .ok_or_else(|| MaplogError::invalid_log("missing magic header"))?;
    let (mut entries, consumed): (Vec<Entry>, usize) =
        bincode::serde::decode_from_slice(body, bincode::config::standard())?;
    if consumed != body.len() {
        return Err(MaplogError::invalid_log(format!(
            "{} trailing bytes after entry records",
            body.len() - consumed
        )));
    }
    entries.sort_by_key(|e| e.order_key);
    Ok(entries)
}

/// Write `entries` to the log at `path`, replacing any existing file
///
/// Untouched entries round-trip byte-faithfully; the write is all-or-nothing.
pub fn write_log(path: &Path, entries: &[Entry]) -> Result<()> {
    info!("Saving {} entries to {:?}", entries.len(), path);
    let mut bytes = MAGIC.to_vec();
    bytes.extend(bincode::serde::encode_to_vec(
        entries,
        bincode::config::standard(),
    )?);
    atomic_write(path, &bytes)
}

/// Atomic file write (write to temp file then rename)
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
