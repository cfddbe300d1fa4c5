//! # maplog - Interactive editor for robotic mower map logs
//!
//! A map log is an ordered, timestamped binary log of recorded messages
//! describing mowing and navigation areas. This crate lets an operator
//! inspect that log, rename, reorder or remove areas, and re-emit a new log
//! file. Before any edit session the original file is backed up into a
//! content-addressed archive store, so a botched edit never costs the map.
//!
//! ## Overview
//!
//! - **Order keys instead of indices**: the mower consumes areas strictly by
//!   message timestamp, so entry order is encoded in a per-entry
//!   [`OrderKey`]. Moves rewrite only the keys of the affected entries,
//!   never renumbering the rest of the sequence.
//! - **Content-addressed backups**: [`BackupStore`] hashes the source file
//!   with SHA-256, skips archiving content it has already seen, compresses
//!   new archives with zstd, and prunes the store to the most recent entries.
//! - **Explicit session state machine**: [`EditSession`] drives the whole
//!   interactive flow (entry menus, overwrite confirmation, unsaved-changes
//!   guard) against the abstract [`Prompt`] trait, so it runs identically on
//!   a terminal or a scripted input source.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use maplog::{BackupStore, ConsolePrompt, EditSession, logfile};
//! use std::path::Path;
//!
//! # fn main() -> maplog::Result<()> {
//! let input = Path::new("map.log");
//!
//! // Back up the original before touching it
//! BackupStore::new("./backups", maplog::backup::DEFAULT_RETAIN).backup(input)?;
//!
//! // Load, edit interactively, save
//! let entries = logfile::read_log(input)?;
//! let mut session = EditSession::new(entries, "modified.log");
//! session.run(&mut ConsolePrompt::new())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`hashing`]: streaming SHA-256 content digests
//! - [`backup`]: dedup backup store with retention pruning
//! - [`types`]: entry, category, order key and payload types
//! - [`entries`]: the order-preserving mutation engine
//! - [`logfile`]: binary log serialization boundary
//! - [`menu`]: abstract interactive choice surface
//! - [`session`]: the edit session state machine
//! - [`error`]: error types and handling

pub mod backup;
pub mod entries;
pub mod error;
pub mod hashing;
pub mod logfile;
pub mod menu;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use backup::{BackupRecord, BackupStore};
pub use entries::EntryList;
pub use error::{MaplogError, Result};
pub use menu::{Choice, ConsolePrompt, Prompt, ScriptedPrompt};
pub use session::{EditSession, SessionState};
pub use types::{Category, Entry, OrderKey, Payload};
