//! Replace-or-append patching of sections and subsections
//!
//! Only the bytes of the targeted section body change; content before and
//! after it, sibling sections included, is copied through untouched.
//! Applying the same patch twice gives the same text as applying it once.

use super::{HeadingLevel, Sections, tasks::append_list_items};

/// Body followed by exactly one blank line, or a single blank line for an empty body
///
/// Leading blank lines are dropped, the header match absorbs them on the
/// next run. The indentation of the first non-blank line stays.
fn section_tail(body: &str) -> String {
    let body = body.trim_end();
    let leading = body.len() - body.trim_start().len();
    let body = body[..leading]
        .rfind('\n')
        .map_or(body, |newline| &body[newline + 1..]);

    if body.is_empty() {
        "\n".to_string()
    } else {
        format!("{body}\n\n")
    }
}

fn with_newline(line: &str) -> String {
    if line.ends_with('\n') {
        line.to_string()
    } else {
        format!("{line}\n")
    }
}

/// Heading line only, without the blank lines the header match absorbed
fn heading_line(header: &str) -> String {
    header
        .find('\n')
        .map_or_else(|| with_newline(header), |end| header[..=end].to_string())
}

/// `text` with trailing whitespace removed and a blank line before the new section
fn append_base(text: &str) -> String {
    let base = text.trim_end();

    if base.is_empty() {
        String::new()
    } else {
        format!("{base}\n\n")
    }
}

impl Sections {
    /// Replace the body of section `heading`, or append the section
    ///
    /// When found, the body becomes `new_body` with trailing whitespace
    /// trimmed, followed by one blank line. When missing, the section is
    /// appended at the end of the text as `\n\n{markers} {heading}\n{new_body}\n\n`.
    ///
    /// # Example
    /// ```
    /// use obsidian_journal::prelude::*;
    ///
    /// let sections = Sections::new();
    /// let note = "## Status\nold\n\n## Journal\nkeep-me\n";
    ///
    /// let note = sections.replace_or_append_section(note, "Evening Advice", "- rest", HeadingLevel::H2);
    /// assert_eq!(note, "## Status\nold\n\n## Journal\nkeep-me\n\n## Evening Advice\n- rest\n\n");
    /// ```
    #[must_use]
    pub fn replace_or_append_section(
        &self,
        text: &str,
        heading: &str,
        new_body: &str,
        level: HeadingLevel,
    ) -> String {
        let Some(section) = self.find(text, heading, level) else {
            return format!(
                "{}{} {heading}\n{}",
                append_base(text),
                level.markers(),
                section_tail(new_body)
            );
        };

        let header = if new_body.trim_end().is_empty() {
            heading_line(section.header())
        } else {
            with_newline(section.header())
        };

        let mut patched = String::with_capacity(text.len() + new_body.len());
        patched.push_str(&text[..section.header_span().start]);
        patched.push_str(&header);
        patched.push_str(&section_tail(new_body));
        patched.push_str(&text[section.body_span().end..]);
        patched
    }

    /// Replace or append subsection `subsection_heading` inside section `section_heading`
    ///
    /// Only the parent's body is searched, so a heading with the same name
    /// under another parent is never touched. Other subsections of the parent
    /// keep their content and order. A missing parent is appended together
    /// with the subsection. A `subsection_level` not deeper than
    /// `section_level` is taken as the level right below it.
    ///
    /// # Example
    /// ```
    /// use obsidian_journal::prelude::*;
    ///
    /// let sections = Sections::new();
    /// let note = "# GTD\n## Inbox\n- x\n## Today's Tasks\n- [ ] old\n# Journal\n";
    ///
    /// let note = sections.update_subsection_in_section(
    ///     note,
    ///     "GTD",
    ///     "Today's Tasks",
    ///     "- [ ] new",
    ///     HeadingLevel::H1,
    ///     HeadingLevel::H2,
    /// );
    /// assert_eq!(note, "# GTD\n## Inbox\n- x\n## Today's Tasks\n- [ ] new\n\n# Journal\n");
    /// ```
    #[must_use]
    pub fn update_subsection_in_section(
        &self,
        text: &str,
        section_heading: &str,
        subsection_heading: &str,
        new_body: &str,
        section_level: HeadingLevel,
        subsection_level: HeadingLevel,
    ) -> String {
        let subsection_level = subsection_level.below(section_level);

        let Some(section) = self.find(text, section_heading, section_level) else {
            return format!(
                "{}{} {section_heading}\n\n{} {subsection_heading}\n{}",
                append_base(text),
                section_level.markers(),
                subsection_level.markers(),
                section_tail(new_body)
            );
        };

        let body = self.replace_or_append_section(
            section.body(),
            subsection_heading,
            new_body,
            subsection_level,
        );

        let mut patched = String::with_capacity(text.len() + new_body.len());
        patched.push_str(&text[..section.header_span().start]);
        patched.push_str(&with_newline(section.header()));
        patched.push_str(&section_tail(&body));
        patched.push_str(&text[section.body_span().end..]);
        patched
    }

    /// Body of section `heading` with trailing whitespace trimmed
    #[must_use]
    pub fn section_body<'t>(
        &self,
        text: &'t str,
        heading: &str,
        level: HeadingLevel,
    ) -> Option<&'t str> {
        self.find(text, heading, level)
            .map(|section| section.body().trim_end())
    }

    /// Body of subsection `subsection_heading` of section `section_heading`
    #[must_use]
    pub fn subsection_body<'t>(
        &self,
        text: &'t str,
        section_heading: &str,
        subsection_heading: &str,
        section_level: HeadingLevel,
        subsection_level: HeadingLevel,
    ) -> Option<&'t str> {
        let section = self.find(text, section_heading, section_level)?;
        self.section_body(
            section.body(),
            subsection_heading,
            subsection_level.below(section_level),
        )
    }

    /// Append one `- item` bullet to a subsection, creating it if needed
    #[must_use]
    pub fn append_subsection_item(
        &self,
        text: &str,
        section_heading: &str,
        subsection_heading: &str,
        item: &str,
        section_level: HeadingLevel,
        subsection_level: HeadingLevel,
    ) -> String {
        let existing = self
            .subsection_body(
                text,
                section_heading,
                subsection_heading,
                section_level,
                subsection_level,
            )
            .unwrap_or_default();

        let body = append_list_items(existing, [item]);

        self.update_subsection_in_section(
            text,
            section_heading,
            subsection_heading,
            &body,
            section_level,
            subsection_level,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "---\nmood: bad\n---\n\n## Status\nold\n\n## Journal\nkeep-me\n";

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn replace_keeps_frontmatter_and_siblings() {
        let sections = Sections::new();
        let patched =
            sections.replace_or_append_section(NOTE, "Status", "new status text", HeadingLevel::H2);

        assert_eq!(
            patched,
            "---\nmood: bad\n---\n\n## Status\nnew status text\n\n## Journal\nkeep-me\n"
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn append_missing_section_at_end() {
        let sections = Sections::new();
        let patched =
            sections.replace_or_append_section(NOTE, "Evening Advice", "- rest", HeadingLevel::H2);

        assert_eq!(
            patched,
            "---\nmood: bad\n---\n\n## Status\nold\n\n## Journal\nkeep-me\n\n## Evening Advice\n- rest\n\n"
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn append_to_blank_text() {
        let sections = Sections::new();

        assert_eq!(
            sections.replace_or_append_section("\n\n", "Status", "ok\n\n\n", HeadingLevel::H2),
            "## Status\nok\n\n"
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn replace_middle_sibling_only() {
        let sections = Sections::new();
        let text = "## A\na-body\n\n## B\nb-body\n\n### B.1\nnested\n\n## C\nc-body\n";
        let patched = sections.replace_or_append_section(text, "B", "fresh", HeadingLevel::H2);

        assert_eq!(patched, "## A\na-body\n\n## B\nfresh\n\n## C\nc-body\n");
        assert!(patched.starts_with("## A\na-body\n\n"));
        assert!(patched.ends_with("## C\nc-body\n"));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn replace_keeps_blank_lines_after_heading() {
        let sections = Sections::new();
        let patched =
            sections.replace_or_append_section("## S\n\nold\n", "S", "new", HeadingLevel::H2);

        assert_eq!(patched, "## S\n\nnew\n\n");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn replace_heading_on_last_line() {
        let sections = Sections::new();
        let patched = sections.replace_or_append_section("intro\n## S", "S", "body", HeadingLevel::H2);

        assert_eq!(patched, "intro\n## S\nbody\n\n");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn replace_drops_leading_blank_lines_of_body() {
        let sections = Sections::new();
        let text = "## Status\nold\n\n## Journal\nkeep-me\n";

        let once = sections.replace_or_append_section(text, "Status", "\nnew status", HeadingLevel::H2);
        assert_eq!(once, "## Status\nnew status\n\n## Journal\nkeep-me\n");

        let indented = sections.replace_or_append_section(text, "Status", " \n\n  - a\n", HeadingLevel::H2);
        assert_eq!(indented, "## Status\n  - a\n\n## Journal\nkeep-me\n");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn replace_is_idempotent() {
        let sections = Sections::new();
        let documents = [
            NOTE,
            "",
            "## S",
            "## S\n\n\n",
            "# Title\n## S\nx\n### Deep\ny\n## T\nz",
            "## S\r\nold\r\n## T\r\n",
        ];
        let bodies = [
            "",
            "line",
            "- a\n- b\n\n\n",
            "  indented\n",
            "\nnew status",
            "\n\n- a\n",
            "  \n- b",
        ];

        for document in documents {
            for body in bodies {
                let once = sections.replace_or_append_section(document, "S", body, HeadingLevel::H2);
                let twice = sections.replace_or_append_section(&once, "S", body, HeadingLevel::H2);

                assert_eq!(once, twice, "document {document:?}, body {body:?}");
            }
        }
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn update_subsection_keeps_other_subsections() {
        let sections = Sections::new();
        let text = "# GTD\n\n## Inbox\n- x\n\n## Today's Tasks\n- [ ] old\n\n## Someday\n- y\n\n# Journal\nj\n";

        let patched = sections.update_subsection_in_section(
            text,
            "GTD",
            "Today's Tasks",
            "- [ ] new",
            HeadingLevel::H1,
            HeadingLevel::H2,
        );

        assert_eq!(
            patched,
            "# GTD\n\n## Inbox\n- x\n\n## Today's Tasks\n- [ ] new\n\n## Someday\n- y\n\n# Journal\nj\n"
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn update_subsection_creates_parent() {
        let sections = Sections::new();

        let patched = sections.update_subsection_in_section(
            NOTE,
            "GTD",
            "Today's Tasks",
            "- [ ] a\n",
            HeadingLevel::H1,
            HeadingLevel::H2,
        );

        assert_eq!(
            patched,
            format!("{}\n\n# GTD\n\n## Today's Tasks\n- [ ] a\n\n", NOTE.trim_end())
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn update_subsection_in_empty_parent() {
        let sections = Sections::new();

        let patched = sections.update_subsection_in_section(
            "## Journal\n## Other\nx\n",
            "Journal",
            "Morning",
            "- [07:00] up",
            HeadingLevel::H2,
            HeadingLevel::H3,
        );

        assert_eq!(patched, "## Journal\n### Morning\n- [07:00] up\n\n## Other\nx\n");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn update_subsection_only_inside_parent() {
        let sections = Sections::new();
        let text = "## Work\n### Notes\nwork-notes\n\n## Home\n### Notes\nhome-notes\n";

        let patched = sections.update_subsection_in_section(
            text,
            "Home",
            "Notes",
            "replaced",
            HeadingLevel::H2,
            HeadingLevel::H3,
        );

        assert_eq!(
            patched,
            "## Work\n### Notes\nwork-notes\n\n## Home\n### Notes\nreplaced\n\n"
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn update_subsection_is_idempotent() {
        let sections = Sections::new();

        for document in [NOTE, "", "## Journal\n", "## Journal\n### Evening\nold\n## X\n"] {
            let once = sections.update_subsection_in_section(
                document,
                "Journal",
                "Evening",
                "- entry",
                HeadingLevel::H2,
                HeadingLevel::H3,
            );
            let twice = sections.update_subsection_in_section(
                &once,
                "Journal",
                "Evening",
                "- entry",
                HeadingLevel::H2,
                HeadingLevel::H3,
            );

            assert_eq!(once, twice, "document {document:?}");
        }
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn update_subsection_at_parent_level_nests() {
        let sections = Sections::new();
        let update = |text: &str| {
            sections.update_subsection_in_section(
                text,
                "J",
                "E",
                "e",
                HeadingLevel::H2,
                HeadingLevel::H2,
            )
        };

        let once = update("## J\nx\n");
        assert_eq!(once, "## J\nx\n\n### E\ne\n\n");
        assert_eq!(update(once.as_str()), once);

        assert_eq!(update(""), "## J\n\n### E\ne\n\n");
        assert_eq!(
            sections.subsection_body(&once, "J", "E", HeadingLevel::H2, HeadingLevel::H1),
            Some("e")
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn section_and_subsection_body() {
        let sections = Sections::new();
        let text = "# GTD\n## Today's Tasks\n- [ ] a\n\n\n# Journal\n";

        assert_eq!(sections.section_body(text, "Journal", HeadingLevel::H1), Some(""));
        assert_eq!(sections.section_body(text, "Missing", HeadingLevel::H1), None);
        assert_eq!(
            sections.subsection_body(
                text,
                "GTD",
                "Today's Tasks",
                HeadingLevel::H1,
                HeadingLevel::H2
            ),
            Some("- [ ] a")
        );
        assert_eq!(
            sections.subsection_body(text, "Journal", "Today's Tasks", HeadingLevel::H1, HeadingLevel::H2),
            None
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn append_subsection_item_twice() {
        let sections = Sections::new();
        let text = "## Status\nok\n";

        let text = sections.append_subsection_item(
            text,
            "Journal",
            "Morning",
            "[07:00] woke up",
            HeadingLevel::H2,
            HeadingLevel::H3,
        );
        let text = sections.append_subsection_item(
            &text,
            "Journal",
            "Morning",
            "[07:30] coffee",
            HeadingLevel::H2,
            HeadingLevel::H3,
        );

        assert_eq!(
            text,
            "## Status\nok\n\n## Journal\n\n### Morning\n- [07:00] woke up\n- [07:30] coffee\n\n"
        );
    }
}
