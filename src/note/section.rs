//! Locating heading-delimited sections
//!
//! A section with heading `Status` at level 2 starts at a line
//! `## Status` and its body runs until the next line opening a heading of
//! level 1 or 2 (`# ...`, `## ...`), or the end of the text. Deeper headings
//! belong to the body. The same rule applies to any substring, so a
//! subsection is found by searching the parent's body.

use super::HeadingLevel;
use regex::Regex;
use std::{cell::RefCell, collections::HashMap, ops::Range};

/// Located section inside some text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMatch<'t> {
    text: &'t str,
    header: Range<usize>,
    body: Range<usize>,
}

impl<'t> SectionMatch<'t> {
    /// Heading line, plus blank lines directly following it
    #[must_use]
    pub fn header(&self) -> &'t str {
        &self.text[self.header.clone()]
    }

    /// Section body, up to the next heading of the same or higher level
    #[must_use]
    pub fn body(&self) -> &'t str {
        &self.text[self.body.clone()]
    }

    /// Byte span of [`SectionMatch::header`]
    #[must_use]
    pub fn header_span(&self) -> Range<usize> {
        self.header.clone()
    }

    /// Byte span of [`SectionMatch::body`]
    #[must_use]
    pub fn body_span(&self) -> Range<usize> {
        self.body.clone()
    }
}

/// Section locator and patcher
///
/// Owns the compiled heading patterns. They are built on first use per
/// `(level, heading)` and reused afterwards; results never depend on what is
/// cached. Construct one per process (or per [`Journal`]) and pass it around.
///
/// [`Journal`]: crate::vault::Journal
#[derive(Debug, Default)]
pub struct Sections {
    headers: RefCell<HashMap<(HeadingLevel, String), Regex>>,
    boundaries: RefCell<HashMap<HeadingLevel, Regex>>,
}

impl Sections {
    /// Create locator with an empty pattern cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn header_regex(&self, heading: &str, level: HeadingLevel) -> Option<Regex> {
        let key = (level, heading.to_string());
        if let Some(regex) = self.headers.borrow().get(&key) {
            return Some(regex.clone());
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(heading, %level, "Compile section pattern");

        let pattern = format!(
            r"(?m)^#{{{}}}[ \t]+{}\s*(?:\n|\z)",
            level.get(),
            regex::escape(heading)
        );

        let regex = Self::compile(&pattern)?;
        self.headers.borrow_mut().insert(key, regex.clone());
        Some(regex)
    }

    fn boundary_regex(&self, level: HeadingLevel) -> Option<Regex> {
        if let Some(regex) = self.boundaries.borrow().get(&level) {
            return Some(regex.clone());
        }

        let regex = Self::compile(&format!(r"(?m)^#{{1,{}}}\s", level.get()))?;
        self.boundaries.borrow_mut().insert(level, regex.clone());
        Some(regex)
    }

    fn compile(pattern: &str) -> Option<Regex> {
        match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(_error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_error, "Section pattern rejected, treating as not found");

                None
            }
        }
    }

    /// Find the first section `heading` at exactly `level`
    ///
    /// The heading must match exactly and case-sensitively; only whitespace
    /// may follow it on the line. Returns [`None`] if there is no such
    /// section, which callers treat as "append a new one".
    ///
    /// # Example
    /// ```
    /// use obsidian_journal::prelude::*;
    ///
    /// let sections = Sections::new();
    /// let text = "# GTD\n## Today's Tasks\n- [ ] a\n### Notes\nn\n# Journal\n";
    ///
    /// let found = sections.find(text, "Today's Tasks", HeadingLevel::H2).unwrap();
    /// assert_eq!(found.body(), "- [ ] a\n### Notes\nn\n");
    ///
    /// assert!(sections.find(text, "Today's", HeadingLevel::H2).is_none());
    /// assert!(sections.find(text, "Today's Tasks", HeadingLevel::H3).is_none());
    /// ```
    #[must_use]
    pub fn find<'t>(
        &self,
        text: &'t str,
        heading: &str,
        level: HeadingLevel,
    ) -> Option<SectionMatch<'t>> {
        let header = self.header_regex(heading, level)?.find(text)?;
        let body_start = header.end();

        let body_end = self
            .boundary_regex(level)
            .and_then(|boundary| boundary.find_at(text, body_start))
            .map_or(text.len(), |next| next.start());

        Some(SectionMatch {
            text,
            header: header.range(),
            body: body_start..body_end,
        })
    }

    /// Level at which `heading` exists, probing 1, 2 and 3 in order
    ///
    /// Defaults to level 1 when the heading is not found at all.
    #[must_use]
    pub fn detect_level(&self, text: &str, heading: &str) -> HeadingLevel {
        [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3]
            .into_iter()
            .find(|level| self.find(text, heading, *level).is_some())
            .unwrap_or(HeadingLevel::H1)
    }
}
