//! Error handling for journal file operations
//!
//! Text patching never fails: a missing heading means "append", a broken
//! frontmatter block means "no frontmatter". Only the filesystem side of the
//! crate returns these errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for journal operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed (reading a note, creating directories, writing a backup, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A write target resolves outside of its configured write root
    ///
    /// This is a hard failure: nothing is created or modified on disk.
    ///
    /// # Example
    /// ```no_run
    /// use obsidian_journal::prelude::*;
    ///
    /// let writer = SafeWriter::new("/vault/.backups", "/vault/Diary");
    ///
    /// // Escapes `/vault/Diary`
    /// writer.write("/vault/Diary/../secrets.md", "data").unwrap_err();
    /// ```
    #[error("Write blocked: `{path}` not under `{write_root}`")]
    WriteBlocked {
        /// Resolved target path
        path: PathBuf,

        /// Resolved write root
        write_root: PathBuf,
    },

    /// YAML parsing error in the configuration file
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// Configuration file does not exist
    #[error("Config not found: `{0}`")]
    ConfigNotFound(PathBuf),

    /// A weekly note was requested but `diary_week_root` is not configured
    #[error("Missing config: diary_week_root")]
    MissingWeekRoot,

    /// Note file name does not encode a date or week
    #[error("Path: `{0}` is not a dated note")]
    InvalidNoteName(PathBuf),
}
