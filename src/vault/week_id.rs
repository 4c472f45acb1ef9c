//! ISO week identifiers and weekly note names

use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;

/// ISO week, rendered as `YYYY-W{week}` without zero padding
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use obsidian_journal::vault::WeekId;
///
/// let date = NaiveDate::from_ymd_opt(2025, 12, 29).unwrap();
/// let week = WeekId::from_date(date);
///
/// assert_eq!(week.to_string(), "2026-W1");
/// assert_eq!(week.file_stem(), "2026-W1");
/// assert_eq!(week.legacy_file_stem(), "2026-W01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekId {
    year: i32,
    week: u32,
}

impl WeekId {
    /// Week containing `date`, with the ISO year
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();

        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Create week id, [`None`] if the year has no such ISO week
    #[must_use]
    pub fn new(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|_| Self { year, week })
    }

    /// Parse `YYYY-W7` or the legacy `YYYY-W07`
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (year, week) = text.trim().split_once("-W")?;

        if year.len() != 4 || !(1..=2).contains(&week.len()) {
            return None;
        }

        if !year.bytes().chain(week.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        Self::new(year.parse().ok()?, week.parse().ok()?)
    }

    /// ISO year
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// ISO week number, `1..=53`
    #[must_use]
    pub const fn week(self) -> u32 {
        self.week
    }

    /// Monday of this week
    #[must_use]
    pub fn monday(self) -> NaiveDate {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).unwrap_or_default()
    }

    /// File stem weekly notes are written under
    #[must_use]
    pub fn file_stem(self) -> String {
        self.to_string()
    }

    /// Zero-padded stem of older notes, only looked up, never written
    #[must_use]
    pub fn legacy_file_stem(self) -> String {
        format!("{}-W{:02}", self.year, self.week)
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{}", self.year, self.week)
    }
}
