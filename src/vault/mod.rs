//! Journal notes on disk
//!
//! [`Journal`] ties the text operations of [`note`](crate::note) to the
//! daily and weekly note files of a vault. Each operation reads a note,
//! patches it in memory and hands the result to the [`SafeWriter`], so a run
//! that changes nothing touches nothing.
//!
//! # Example
//! ```no_run
//! use chrono::{Local, NaiveDate};
//! use obsidian_journal::prelude::*;
//!
//! let journal = Journal::from_config_file(None).unwrap();
//! let today = Local::now().date_naive();
//!
//! let note = journal.ensure_daily_file(today).unwrap();
//! journal.append_gtd_tasks(&note, ["Buy milk", "Call dentist"]).unwrap();
//! journal
//!     .append_journal_entry(&note, "Chat", "Felt good after the run", Local::now().naive_local())
//!     .unwrap();
//! ```

pub mod normalize;
pub mod week_id;
pub mod writer;


pub use normalize::{NormalizeReport, normalize_week_notes};
pub use week_id::WeekId;
pub use writer::SafeWriter;

use crate::{
    config::JournalConfig,
    error::Error,
    note::{HeadingLevel, Sections, merge_task_body, normalize_tasks, render_template},
    plan::{GoalGraph, WeeklyPlanEntry, build_weekly_plan, upsert_weekly_tasks},
};
use chrono::{NaiveDate, NaiveDateTime};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Top-level section holding the task checklist of the day
pub const GTD_HEADING: &str = "GTD";

/// Checklist heading, level 2 inside [`GTD_HEADING`] or on its own
pub const TODAY_TASKS_HEADING: &str = "Today's Tasks";

/// Level 2 section holding timestamped entries, grouped by level 3 subsections
pub const JOURNAL_HEADING: &str = "Journal";

/// Daily and weekly notes of one vault
#[derive(Debug)]
pub struct Journal {
    config: JournalConfig,
    sections: Sections,
    writer: SafeWriter,
    week_writer: Option<SafeWriter>,
}

impl Journal {
    /// Create journal from loaded config
    #[must_use]
    pub fn new(config: JournalConfig) -> Self {
        let writer = SafeWriter::new(&config.backup_root, &config.write_root);
        let week_writer = config
            .week_write_root()
            .map(|root| writer.with_write_root(root));

        Self {
            config,
            sections: Sections::new(),
            writer,
            week_writer,
        }
    }

    /// Load config (see [`JournalConfig::load`]) and create journal
    ///
    /// # Errors
    /// See [`JournalConfig::load`]
    pub fn from_config_file(path: Option<&Path>) -> Result<Self, Error> {
        JournalConfig::load(path).map(Self::new)
    }

    /// Config this journal was created from
    #[must_use]
    pub const fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// Section locator shared by all operations
    #[must_use]
    pub const fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Writer for daily notes
    #[must_use]
    pub const fn writer(&self) -> &SafeWriter {
        &self.writer
    }

    /// Writer for weekly notes
    ///
    /// # Errors
    /// - [`Error::MissingWeekRoot`] without `diary_week_root`
    pub fn week_writer(&self) -> Result<&SafeWriter, Error> {
        self.week_writer.as_ref().ok_or(Error::MissingWeekRoot)
    }

    /// Directory of weekly notes
    ///
    /// # Errors
    /// - [`Error::MissingWeekRoot`] without `diary_week_root`
    pub fn week_root(&self) -> Result<&Path, Error> {
        self.config
            .diary_week_root
            .as_deref()
            .ok_or(Error::MissingWeekRoot)
    }

    /// `{diary_day_root}/{YYYY-MM-DD}.md`
    #[must_use]
    pub fn daily_note_path(&self, date: NaiveDate) -> PathBuf {
        self.config
            .diary_day_root
            .join(format!("{}.md", date.format("%Y-%m-%d")))
    }

    /// Weekly note of the ISO week containing `date`
    ///
    /// An existing `2026-W1.md` wins over an existing legacy `2026-W01.md`;
    /// without either, the canonical path is returned.
    ///
    /// # Errors
    /// - [`Error::MissingWeekRoot`] without `diary_week_root`
    pub fn weekly_note_path(&self, date: NaiveDate) -> Result<PathBuf, Error> {
        let root = self.week_root()?;
        let week = WeekId::from_date(date);

        let canonical = root.join(format!("{}.md", week.file_stem()));
        let legacy = root.join(format!("{}.md", week.legacy_file_stem()));

        if !canonical.exists() && legacy.exists() {
            return Ok(legacy);
        }

        Ok(canonical)
    }

    /// Read `template` and render it for `date`, [`None`] if not configured or missing
    fn read_template(template: Option<&Path>, date: NaiveDate) -> Result<Option<String>, Error> {
        match template {
            Some(template) if template.is_file() => {
                Ok(Some(render_template(&fs::read_to_string(template)?, date)))
            }
            _ => Ok(None),
        }
    }

    /// Create the daily note for `date` if it does not exist
    ///
    /// New notes come from the daily template, or a minimal skeleton without
    /// one. Existing notes are left untouched.
    ///
    /// # Errors
    /// - [`Error::WriteBlocked`] if the daily root is outside the write root
    /// - [`Error::Io`] on filesystem failures
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn ensure_daily_file(&self, date: NaiveDate) -> Result<PathBuf, Error> {
        let path = self.daily_note_path(date);
        if path.exists() {
            return Ok(path);
        }

        let text = Self::read_template(self.config.daily_template_path.as_deref(), date)?
            .unwrap_or_else(|| {
                format!(
                    "---\njournal: day\njournal-date: {}\n---\n\n# 记录\n",
                    date.format("%Y-%m-%d")
                )
            });

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), "Create daily note");

        self.writer.write(&path, &text)?;
        Ok(path)
    }

    /// Create the weekly note for the week of `date` if it does not exist
    ///
    /// # Errors
    /// - [`Error::MissingWeekRoot`] without `diary_week_root`
    /// - [`Error::WriteBlocked`] if the week root is outside the week write root
    /// - [`Error::Io`] on filesystem failures
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn ensure_weekly_file(&self, date: NaiveDate) -> Result<PathBuf, Error> {
        let path = self.weekly_note_path(date)?;
        if path.exists() {
            return Ok(path);
        }

        let text = Self::read_template(self.config.weekly_template_path.as_deref(), date)?
            .unwrap_or_else(|| {
                format!(
                    "---\njournal: week\njournal-week: {}\n---\n\n# Weekly Tasks\n",
                    WeekId::from_date(date)
                )
            });

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), "Create weekly note");

        self.week_writer()?.write(&path, &text)?;
        Ok(path)
    }

    /// Read `path`, apply `patch` and write the result with `writer`
    fn patch_with(
        writer: &SafeWriter,
        path: &Path,
        patch: impl FnOnce(&str) -> String,
    ) -> Result<Option<PathBuf>, Error> {
        let text = fs::read_to_string(path)?;
        writer.write(path, &patch(&text))
    }

    /// Read a daily note, patch it and write it back
    ///
    /// Returns the backup path if the note changed.
    ///
    /// # Errors
    /// - [`Error::WriteBlocked`] if `path` is outside the write root
    /// - [`Error::Io`] on filesystem failures
    ///
    /// # Example
    /// ```no_run
    /// use obsidian_journal::prelude::*;
    ///
    /// let journal = Journal::from_config_file(None).unwrap();
    /// let path = journal.daily_note_path(chrono::Local::now().date_naive());
    ///
    /// journal
    ///     .patch_note(&path, |text| {
    ///         journal.sections().replace_or_append_section(text, "Status", "- rested", HeadingLevel::H2)
    ///     })
    ///     .unwrap();
    /// ```
    pub fn patch_note(
        &self,
        path: impl AsRef<Path>,
        patch: impl FnOnce(&str) -> String,
    ) -> Result<Option<PathBuf>, Error> {
        Self::patch_with(&self.writer, path.as_ref(), patch)
    }

    /// Merge tasks into `# GTD` / `## Today's Tasks`
    ///
    /// Labels already in the checklist (checked or not) are skipped. Nothing
    /// is read or written when `tasks` is empty after cleaning.
    ///
    /// # Errors
    /// See [`Journal::patch_note`]
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(path = %path.as_ref().display())))]
    pub fn append_gtd_tasks<I>(
        &self,
        path: impl AsRef<Path>,
        tasks: I,
    ) -> Result<Option<PathBuf>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let tasks = normalize_tasks(tasks);
        if tasks.is_empty() {
            return Ok(None);
        }

        self.patch_note(path, |text| {
            let existing = self
                .sections
                .subsection_body(
                    text,
                    GTD_HEADING,
                    TODAY_TASKS_HEADING,
                    HeadingLevel::H1,
                    HeadingLevel::H2,
                )
                .unwrap_or_default();

            self.sections.update_subsection_in_section(
                text,
                GTD_HEADING,
                TODAY_TASKS_HEADING,
                &merge_task_body(existing, &tasks),
                HeadingLevel::H1,
                HeadingLevel::H2,
            )
        })
    }

    /// Append `- [HH:MM] content` to `## Journal` / `### {subsection}`
    ///
    /// Blank content is a no-op.
    ///
    /// # Errors
    /// See [`Journal::patch_note`]
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(path = %path.as_ref().display(), subsection = subsection)))]
    pub fn append_journal_entry(
        &self,
        path: impl AsRef<Path>,
        subsection: &str,
        content: &str,
        timestamp: NaiveDateTime,
    ) -> Result<Option<PathBuf>, Error> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        let entry = format!("[{}] {content}", timestamp.format("%H:%M"));

        self.patch_note(path, |text| {
            self.sections.append_subsection_item(
                text,
                JOURNAL_HEADING,
                subsection,
                &entry,
                HeadingLevel::H2,
                HeadingLevel::H3,
            )
        })
    }

    /// Merge tasks into the level 2 `## Today's Tasks` section
    ///
    /// Used to hand suggested tasks over to the next day's note.
    ///
    /// # Errors
    /// See [`Journal::patch_note`]
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(path = %path.as_ref().display())))]
    pub fn merge_today_tasks<I>(
        &self,
        path: impl AsRef<Path>,
        tasks: I,
    ) -> Result<Option<PathBuf>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let tasks = normalize_tasks(tasks);
        if tasks.is_empty() {
            return Ok(None);
        }

        self.patch_note(path, |text| {
            let existing = self
                .sections
                .section_body(text, TODAY_TASKS_HEADING, HeadingLevel::H2)
                .unwrap_or_default();

            self.sections.replace_or_append_section(
                text,
                TODAY_TASKS_HEADING,
                &merge_task_body(existing, &tasks),
                HeadingLevel::H2,
            )
        })
    }

    /// Write the weekly plan into the weekly note of `date`
    ///
    /// Creates the note if needed, renders leftover template tokens for
    /// `date` and replaces the `Weekly Tasks` section with the plan built
    /// from `graph` and `prior`.
    ///
    /// # Errors
    /// - [`Error::MissingWeekRoot`] without `diary_week_root`
    /// - See [`Journal::patch_note`]
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, graph, prior)))]
    pub fn update_weekly_plan(
        &self,
        date: NaiveDate,
        graph: Option<&GoalGraph>,
        prior: &[WeeklyPlanEntry],
    ) -> Result<Option<PathBuf>, Error> {
        let path = self.ensure_weekly_file(date)?;
        let plan = build_weekly_plan(graph, prior);

        Self::patch_with(self.week_writer()?, &path, |text| {
            upsert_weekly_tasks(&self.sections, &render_template(text, date), &plan)
        })
    }
}
