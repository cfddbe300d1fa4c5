//! Content-addressed backup store with retention pruning
//!
//! Before a log file is opened for editing it is archived here. Archives are
//! named `<original_basename>_<UTC timestamp>_<content digest>.zst`, so the
//! set of existing backups is reconstructed entirely by parsing filenames; no
//! separate index file exists. At most one archive is kept per distinct
//! digest, and the store is capped at the most recent entries.

use crate::error::Result;
use crate::hashing::hash_file;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Colon-free ISO-like timestamp used inside archive filenames
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H%M%S";

/// Archive filename extension
const ARCHIVE_EXT: &str = "zst";

/// Maximum regular zstd compression level; archives are cold storage, so
/// ratio wins over speed
const ARCHIVE_COMPRESSION_LEVEL: i32 = 19;

/// Default number of archives retained after pruning
pub const DEFAULT_RETAIN: usize = 30;

/// One archived copy of a source file, reconstructed from its filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// Basename of the file that was backed up
    pub original_name: String,
    /// When the archive was written (UTC, second precision)
    pub created_at: DateTime<Utc>,
    /// Hex content digest of the uncompressed source
    pub content_digest: String,
    /// Full path of the archive inside the backup directory
    pub path: PathBuf,
}

/// Owns a backup directory and its contents
#[derive(Debug)]
pub struct BackupStore {
    dir: PathBuf,
    retain: usize,
}

impl BackupStore {
    /// Create a store over `dir`, keeping at most `retain` archives
    pub fn new(dir: impl Into<PathBuf>, retain: usize) -> Self {
        Self {
            dir: dir.into(),
            retain,
        }
    }

    /// Backup directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Back up `source` if its content is not already archived
    ///
    /// Returns the path of the newly written archive, or `None` when an
    /// archive with the same content digest already exists (idempotent
    /// no-op). Directory creation, hashing and archive write failures are
    /// fatal; failures while pruning individual stale archives are logged and
    /// skipped.
    pub fn backup(&self, source: &Path) -> Result<Option<PathBuf>> {
        if !self.dir.exists() {
            info!("Creating backup directory {:?}", self.dir);
            fs::create_dir_all(&self.dir)?;
        }

        let digest = hash_file(source)?;
        let existing: Vec<String> = self
            .list_backups()?
            .into_iter()
            .map(|r| r.content_digest)
            .collect();
        if existing.iter().any(|d| *d == digest) {
            info!(
                "This version of {:?} has already been backed up (digest {})",
                source, digest
            );
            return Ok(None);
        }

        let basename = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "log".to_string());
        let archive_name = format!(
            "{}_{}_{}.{}",
            basename,
            Utc::now().format(TIMESTAMP_FORMAT),
            digest,
            ARCHIVE_EXT
        );
        let archive_path = self.dir.join(archive_name);

        info!(
            "Backing up {:?} (digest {}) to {:?}",
            source, digest, archive_path
        );
        let reader = BufReader::new(File::open(source)?);
        let writer = File::create(&archive_path)?;
        zstd::stream::copy_encode(reader, writer, ARCHIVE_COMPRESSION_LEVEL)?;

        self.prune()?;
        Ok(Some(archive_path))
    }

    /// Parse the backup directory into records, newest filename first
    ///
    /// Filenames that do not follow the archive naming convention are
    /// ignored.
    pub fn list_backups(&self) -> Result<Vec<BackupRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort_by(|a, b| b.cmp(a));
        Ok(names
            .iter()
            .filter_map(|name| self.parse_archive_name(name))
            .collect())
    }

    /// Delete every archive beyond the `retain` most recent
    ///
    /// Filename-descending order approximates newest-first because the
    /// timestamp follows the basename in the naming convention. The delete
    /// path is always joined to the backup directory; bare filenames would
    /// resolve against the working directory instead.
    fn prune(&self) -> Result<()> {
        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort_by(|a, b| b.cmp(a));

        for stale in names.iter().skip(self.retain) {
            let stale_path = self.dir.join(stale);
            info!("Pruning old backup {:?}", stale_path);
            if let Err(err) = fs::remove_file(&stale_path) {
                warn!("Failed to prune {:?}: {}", stale_path, err);
            }
        }
        Ok(())
    }

    /// Split `<basename>_<timestamp>_<digest>.zst` back into its fields
    fn parse_archive_name(&self, name: &str) -> Option<BackupRecord> {
        let stem = name.strip_suffix(&format!(".{}", ARCHIVE_EXT))?;
        let (rest, digest) = stem.rsplit_once('_')?;
        let (original_name, timestamp) = rest.rsplit_once('_')?;
        let created_at = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .ok()?
            .and_utc();
        if digest.is_empty() || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            debug!("Ignoring non-archive file {:?} in backup directory", name);
            return None;
        }
        Some(BackupRecord {
            original_name: original_name.to_string(),
            created_at,
            content_digest: digest.to_string(),
            path: self.dir.join(name),
        })
    }
}
