//! Diff-gated writes with backups and write-root containment
//!
//! Every file this crate modifies goes through [`SafeWriter`]:
//! 1. The target must resolve (symlinks followed) to a path under the
//!    write root, otherwise [`Error::WriteBlocked`] and nothing on disk changes
//! 2. Identical content is a no-op: no write, no backup
//! 3. Changed content first copies the old file to
//!    `{backup_root}/{YYYYMMDD_HHMMSS}__{file_name}`
//!
//! Backups have one-second resolution, so two changing writes of the same
//! file within a second share a backup name and the second one wins.

use crate::error::Error;
use chrono::{Local, NaiveDateTime};
use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

/// Symlink hops followed while resolving a path that does not exist yet
const MAX_LINK_DEPTH: usize = 40;

/// Resolve `path` like `realpath`, without requiring it to exist
///
/// Existing prefixes are canonicalized, dangling symlinks are followed and
/// the missing tail is appended lexically.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    Ok(resolve_components(&std::path::absolute(path)?, 0))
}

fn resolve_components(path: &Path, depth: usize) -> PathBuf {
    let mut resolved = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                let candidate = resolved.join(name);

                resolved = match fs::canonicalize(&candidate) {
                    Ok(real) => real,
                    Err(_) => match fs::read_link(&candidate) {
                        Ok(target) if depth < MAX_LINK_DEPTH => {
                            resolve_components(&resolved.join(target), depth + 1)
                        }
                        _ => candidate,
                    },
                };
            }
        }
    }

    resolved
}

/// Backup file name: timestamp, two underscores, file name without spaces
fn backup_name(path: &Path, now: NaiveDateTime) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().replace(' ', "_");

    Some(format!("{}__{name}", now.format("%Y%m%d_%H%M%S")))
}

/// Writer confined to one directory tree
///
/// # Example
/// ```
/// use obsidian_journal::prelude::*;
///
/// let vault = tempfile::tempdir().unwrap();
/// let writer = SafeWriter::new(vault.path().join(".backups"), vault.path().join("Diary"));
/// let note = vault.path().join("Diary").join("2026-03-11.md");
///
/// // New file: created with parents, nothing to back up
/// assert_eq!(writer.write(&note, "# 记录\n").unwrap(), None);
///
/// // Same content: nothing happens
/// assert_eq!(writer.write(&note, "# 记录\n").unwrap(), None);
///
/// // Changed content: old version lands in the backup directory
/// let backup = writer.write(&note, "# 记录\n- woke up\n").unwrap().unwrap();
/// assert_eq!(std::fs::read_to_string(backup).unwrap(), "# 记录\n");
///
/// // Outside of the write root
/// assert!(writer.write(vault.path().join("other.md"), "x").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeWriter {
    backup_root: PathBuf,
    write_root: PathBuf,
}

impl SafeWriter {
    /// Create writer, paths are resolved on every write
    pub fn new(backup_root: impl AsRef<Path>, write_root: impl AsRef<Path>) -> Self {
        Self {
            backup_root: backup_root.as_ref().to_path_buf(),
            write_root: write_root.as_ref().to_path_buf(),
        }
    }

    /// Same backups, different write root
    #[must_use]
    pub fn with_write_root(&self, write_root: impl AsRef<Path>) -> Self {
        Self::new(&self.backup_root, write_root)
    }

    /// Directory backups are written to
    #[must_use]
    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Directory all writes must stay under
    #[must_use]
    pub fn write_root(&self) -> &Path {
        &self.write_root
    }

    /// Check that `path` resolves to a descendant of the write root
    ///
    /// Returns the resolved path.
    ///
    /// # Errors
    /// - [`Error::WriteBlocked`] if it resolves elsewhere
    /// - [`Error::Io`] if the current directory is needed and unavailable
    pub fn ensure_write_allowed(&self, path: impl AsRef<Path>) -> Result<PathBuf, Error> {
        let resolved = resolve(path.as_ref())?;
        let root = resolve(&self.write_root)?;

        if resolved != root && resolved.starts_with(&root) {
            return Ok(resolved);
        }

        #[cfg(feature = "tracing")]
        tracing::error!(path = %resolved.display(), write_root = %root.display(), "Write blocked");

        Err(Error::WriteBlocked {
            path: resolved,
            write_root: root,
        })
    }

    /// Write `text` to `path`, backing up a changed file first
    ///
    /// Returns the backup path if one was written.
    ///
    /// # Errors
    /// - [`Error::WriteBlocked`] if `path` is outside of the write root
    /// - [`Error::Io`] on any filesystem failure
    pub fn write(&self, path: impl AsRef<Path>, text: &str) -> Result<Option<PathBuf>, Error> {
        self.write_at(path, text, Local::now().naive_local())
    }

    /// [`SafeWriter::write`] with an explicit backup timestamp
    ///
    /// # Errors
    /// See [`SafeWriter::write`]
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(path = %path.as_ref().display())))]
    pub fn write_at(
        &self,
        path: impl AsRef<Path>,
        text: &str,
        now: NaiveDateTime,
    ) -> Result<Option<PathBuf>, Error> {
        let path = path.as_ref();
        self.ensure_write_allowed(path)?;

        let Some(name) = backup_name(path, now) else {
            return Err(Error::InvalidNoteName(path.to_path_buf()));
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let backup = match fs::read(path) {
            Ok(current) if current == text.as_bytes() => {
                #[cfg(feature = "tracing")]
                tracing::trace!("Content unchanged, skip write");

                return Ok(None);
            }
            Ok(current) => {
                fs::create_dir_all(&self.backup_root)?;

                let backup = self.backup_root.join(name);
                fs::write(&backup, current)?;

                #[cfg(feature = "tracing")]
                tracing::debug!(backup = %backup.display(), "Backup written");

                Some(backup)
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => return Err(error.into()),
        };

        fs::write(path, text)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(bytes = text.len(), "Note written");

        Ok(backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SafeWriter) {
        let dir = TempDir::new().unwrap();
        let writer = SafeWriter::new(dir.path().join("backups"), dir.path().join("Diary"));
        fs::create_dir_all(dir.path().join("Diary")).unwrap();

        (dir, writer)
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 11)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn backups(writer: &SafeWriter) -> usize {
        fs::read_dir(writer.backup_root()).map_or(0, Iterator::count)
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn new_file_has_no_backup() {
        let (dir, writer) = setup();
        let path = dir.path().join("Diary/2026/03/2026-03-11.md");

        assert_eq!(writer.write(&path, "hello\n").unwrap(), None);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        assert_eq!(backups(&writer), 0);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn identical_write_is_noop() {
        let (dir, writer) = setup();
        let path = dir.path().join("Diary/note.md");
        fs::write(&path, "same").unwrap();

        assert_eq!(writer.write(&path, "same").unwrap(), None);
        assert_eq!(writer.write(&path, "same").unwrap(), None);
        assert_eq!(backups(&writer), 0);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn changed_write_backs_up_original() {
        let (dir, writer) = setup();
        let path = dir.path().join("Diary/my note.md");
        fs::write(&path, "old").unwrap();

        let backup = writer.write_at(&path, "new", at(7, 5, 9)).unwrap().unwrap();

        assert_eq!(backup, writer.backup_root().join("20260311_070509__my_note.md"));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old");
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn same_second_backup_is_overwritten() {
        let (dir, writer) = setup();
        let path = dir.path().join("Diary/note.md");
        fs::write(&path, "v1").unwrap();

        let first = writer.write_at(&path, "v2", at(8, 0, 0)).unwrap();
        let second = writer.write_at(&path, "v3", at(8, 0, 0)).unwrap();

        assert_eq!(first, second);
        assert_eq!(backups(&writer), 1);
        assert_eq!(fs::read_to_string(second.unwrap()).unwrap(), "v2");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn outside_write_root_is_blocked() {
        let (dir, writer) = setup();

        for path in [
            dir.path().join("outside.md"),
            dir.path().join("Diary/../outside.md"),
            dir.path().join("Diary2/note.md"),
            dir.path().join("Diary"),
        ] {
            let error = writer.write(&path, "x").unwrap_err();
            assert!(matches!(error, Error::WriteBlocked { .. }), "{}", path.display());
        }

        assert!(!dir.path().join("outside.md").exists());
        assert!(!dir.path().join("Diary2").exists());
        assert_eq!(backups(&writer), 0);
    }

    #[cfg(unix)]
    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn symlink_escape_is_blocked() {
        let (dir, writer) = setup();
        let outside = dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();

        std::os::unix::fs::symlink(&outside, dir.path().join("Diary/link")).unwrap();
        std::os::unix::fs::symlink(outside.join("new.md"), dir.path().join("Diary/dangling.md"))
            .unwrap();

        assert!(writer.write(dir.path().join("Diary/link/note.md"), "x").is_err());
        assert!(writer.write(dir.path().join("Diary/dangling.md"), "x").is_err());
        assert!(!outside.join("note.md").exists());
        assert!(!outside.join("new.md").exists());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn dot_segments_resolve() {
        let (dir, writer) = setup();
        let path = dir.path().join("Diary/./sub/../note.md");

        let resolved = writer.ensure_write_allowed(&path).unwrap();
        assert!(resolved.ends_with("Diary/note.md"));

        let week = writer.with_write_root(dir.path().join("Week"));
        assert_eq!(week.backup_root(), writer.backup_root());
        assert!(week.ensure_write_allowed(&path).is_err());
    }
}
