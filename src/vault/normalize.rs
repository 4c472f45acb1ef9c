//! Normalizing weekly note names and week references
//!
//! Older weekly notes were named `2026-W07.md`; current ones are
//! `2026-W7.md`. The pass below renames legacy notes, renders template tokens
//! left in them for the week's Monday and points their `week` /
//! `journal-week` frontmatter at the canonical id.

use super::{Journal, WeekId};
use crate::{
    error::Error,
    note::{Frontmatter, FrontmatterUpdate, render_template, update_frontmatter},
};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Frontmatter keys holding the week id of a weekly note
const WEEK_KEYS: [&str; 2] = ["week", "journal-week"];

/// Result of [`normalize_week_notes`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// `(from, to)` renames, done or planned
    pub renames: Vec<(PathBuf, PathBuf)>,

    /// Notes whose content was (or would be) rewritten
    pub updates: Vec<PathBuf>,

    /// `(from, to)` renames skipped because the target exists
    pub skipped: Vec<(PathBuf, PathBuf)>,

    /// Weeks with more than one note, and the notes not picked as canonical
    pub duplicates: Vec<(WeekId, Vec<PathBuf>)>,
}

impl NormalizeReport {
    /// Nothing to rename or rewrite
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.renames.is_empty() && self.updates.is_empty()
    }
}

#[derive(Debug, Default)]
struct WeekNotes {
    canonical: Option<PathBuf>,
    duplicates: Vec<PathBuf>,
}

fn is_hidden(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .is_some_and(|e| e.to_str().is_some_and(|name| name.starts_with('.')))
}

fn is_md_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|p| p.eq_ignore_ascii_case("md"))
}

/// Non-hidden `.md` files directly in `root`, sorted by name
fn week_note_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| is_md_file(path))
        .collect()
}

/// Group notes by week; the unpadded name is canonical when present
fn group_by_week(paths: Vec<PathBuf>) -> BTreeMap<WeekId, WeekNotes> {
    let mut weeks: BTreeMap<WeekId, WeekNotes> = BTreeMap::new();

    for path in paths {
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let Some(week) = WeekId::parse(stem) else {
            continue;
        };

        let is_canonical = stem == week.file_stem();
        let notes = weeks.entry(week).or_default();

        match notes.canonical.take() {
            Some(previous) if is_canonical => {
                notes.duplicates.push(previous);
                notes.canonical = Some(path);
            }
            Some(previous) => {
                notes.canonical = Some(previous);
                notes.duplicates.push(path);
            }
            None => notes.canonical = Some(path),
        }
    }

    weeks
}

/// Point existing week keys of the frontmatter at `week`
fn rewrite_week_keys(text: &str, week: WeekId) -> String {
    let frontmatter = Frontmatter::parse(text);
    let updates: FrontmatterUpdate = WEEK_KEYS
        .into_iter()
        .filter(|key| frontmatter.get(key).is_some())
        .map(|key| (key, week.to_string()))
        .collect();

    update_frontmatter(text, &updates)
}

/// Rename legacy weekly notes and fix their week references
///
/// Without `apply` nothing is changed on disk and the report lists what
/// would be done. Renames never overwrite an existing note and are checked
/// against the week write root like every write.
///
/// # Errors
/// - [`Error::MissingWeekRoot`] without `diary_week_root`
/// - [`Error::WriteBlocked`] if a note or rename target is outside the week write root
/// - [`Error::Io`] on filesystem failures
#[cfg_attr(feature = "tracing", tracing::instrument(skip(journal)))]
pub fn normalize_week_notes(journal: &Journal, apply: bool) -> Result<NormalizeReport, Error> {
    let writer = journal.week_writer()?;
    let mut report = NormalizeReport::default();

    for (week, notes) in group_by_week(week_note_files(journal.week_root()?)) {
        let Some(mut canonical) = notes.canonical else {
            continue;
        };

        if !notes.duplicates.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(%week, duplicates = ?notes.duplicates, "Duplicate weekly notes");

            report.duplicates.push((week, notes.duplicates));
        }

        let desired = canonical.with_file_name(format!("{}.md", week.file_stem()));
        let mut rename = canonical != desired;

        if rename && desired.exists() {
            report.skipped.push((canonical.clone(), desired.clone()));
            rename = false;
        }

        let text = fs::read_to_string(&canonical)?;
        let rendered = rewrite_week_keys(&render_template(&text, week.monday()), week);

        if rename {
            if apply {
                writer.ensure_write_allowed(&canonical)?;
                writer.ensure_write_allowed(&desired)?;
                fs::rename(&canonical, &desired)?;

                #[cfg(feature = "tracing")]
                tracing::debug!(from = %canonical.display(), to = %desired.display(), "Weekly note renamed");
            }

            report.renames.push((canonical.clone(), desired.clone()));
            if apply {
                canonical = desired;
            }
        }

        if rendered != text {
            if apply {
                writer.write(&canonical, &rendered)?;
            }

            report.updates.push(canonical);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::vault_test::create_test_journal;

    #[test]
    fn rewrite_only_existing_week_keys() {
        let week = WeekId::new(2026, 7).unwrap();
        let text = "---\nweek: \"[[2026-W07]]\"\ntags: [a]\n---\nweek: body stays\n";

        assert_eq!(
            rewrite_week_keys(text, week),
            "---\nweek: 2026-W7\ntags: [a]\n---\nweek: body stays\n"
        );
        assert_eq!(rewrite_week_keys("no frontmatter\n", week), "no frontmatter\n");
    }

    #[test]
    fn grouping_prefers_unpadded() {
        let weeks = group_by_week(vec![
            PathBuf::from("/w/2026-W07.md"),
            PathBuf::from("/w/2026-W7.md"),
            PathBuf::from("/w/2026-W08.md"),
            PathBuf::from("/w/notes.md"),
        ]);

        assert_eq!(weeks.len(), 2);

        let seventh = &weeks[&WeekId::new(2026, 7).unwrap()];
        assert_eq!(seventh.canonical.as_deref(), Some(Path::new("/w/2026-W7.md")));
        assert_eq!(seventh.duplicates, [PathBuf::from("/w/2026-W07.md")]);

        let eighth = &weeks[&WeekId::new(2026, 8).unwrap()];
        assert_eq!(eighth.canonical.as_deref(), Some(Path::new("/w/2026-W08.md")));
        assert!(eighth.duplicates.is_empty());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn dry_run_changes_nothing() {
        let (_dir, journal) = create_test_journal().unwrap();
        let root = journal.week_root().unwrap().to_path_buf();
        let legacy = root.join("2026-W08.md");
        fs::write(&legacy, "---\njournal-week: 2026-W08\n---\n").unwrap();

        let report = normalize_week_notes(&journal, false).unwrap();

        assert_eq!(report.renames, [(legacy.clone(), root.join("2026-W8.md"))]);
        assert_eq!(report.updates, [legacy.clone()]);
        assert!(legacy.exists());
        assert!(!root.join("2026-W8.md").exists());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn apply_renames_and_rewrites() {
        let (_dir, journal) = create_test_journal().unwrap();
        let root = journal.week_root().unwrap().to_path_buf();

        fs::write(
            root.join("2026-W08.md"),
            "---\njournal-week: 2026-W08\nmonth: <% tp.date.now(\"YYYY-MM\", 0, tp.file.title, \"YYYY-[W]W\") %>\n---\n# Weekly Tasks\n",
        )
        .unwrap();
        fs::write(root.join("2026-W03.md"), "legacy duplicate").unwrap();
        fs::write(root.join("2026-W3.md"), "---\nweek: 2026-W3\n---\n").unwrap();
        fs::write(root.join(".2026-W09.md"), "hidden").unwrap();

        let report = normalize_week_notes(&journal, true).unwrap();

        assert_eq!(report.renames.len(), 1);
        assert_eq!(report.updates, [root.join("2026-W8.md")]);
        assert_eq!(report.duplicates.len(), 1);
        assert!(report.skipped.is_empty());

        assert!(!root.join("2026-W08.md").exists());
        assert_eq!(
            fs::read_to_string(root.join("2026-W8.md")).unwrap(),
            "---\njournal-week: 2026-W8\nmonth: 2026-02\n---\n# Weekly Tasks\n"
        );
        assert_eq!(fs::read_to_string(root.join("2026-W03.md")).unwrap(), "legacy duplicate");

        assert!(normalize_week_notes(&journal, true).unwrap().is_clean());
    }
}
