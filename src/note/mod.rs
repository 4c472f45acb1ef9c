//! Text operations on a single note
//!
//! Everything here is a pure function over `&str`: nothing touches the
//! filesystem and nothing fails. Malformed input degrades to "no match" or
//! "create new" instead of an error, since notes are hand-edited Markdown.
//!
//! # Example
//! ```
//! use obsidian_journal::prelude::*;
//!
//! let sections = Sections::new();
//! let note = "---\nmood: bad\n---\n\n## Status\nold\n\n## Journal\nkeep-me\n";
//!
//! let note = sections.replace_or_append_section(note, "Status", "new status text", HeadingLevel::H2);
//! assert_eq!(note, "---\nmood: bad\n---\n\n## Status\nnew status text\n\n## Journal\nkeep-me\n");
//! ```

pub mod frontmatter;
pub mod outline;
pub mod parser;
pub mod patch;
pub mod section;
pub mod tasks;
pub mod template;

use std::fmt;

pub use frontmatter::{Frontmatter, FrontmatterUpdate, Scalar, Value, update_frontmatter};
pub use outline::{Section, outline};
pub use section::{SectionMatch, Sections};
pub use tasks::{append_list_items, merge_task_body, normalize_tasks};
pub use template::render_template;

/// Markdown heading level, `1..=6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// `#`
    pub const H1: Self = Self(1);

    /// `##`
    pub const H2: Self = Self(2);

    /// `###`
    pub const H3: Self = Self(3);

    /// Create level, [`None`] outside of `1..=6`
    #[must_use]
    pub const fn new(level: u8) -> Option<Self> {
        match level {
            1..=6 => Some(Self(level)),
            _ => None,
        }
    }

    /// Numeric level
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// `self` if deeper than `parent`, otherwise the level right below `parent` (at most 6)
    #[must_use]
    pub const fn below(self, parent: Self) -> Self {
        if self.0 > parent.0 {
            self
        } else if parent.0 < 6 {
            Self(parent.0 + 1)
        } else {
            Self(6)
        }
    }

    /// Heading markers, e.g. `##` for level 2
    #[must_use]
    pub fn markers(self) -> String {
        "#".repeat(usize::from(self.0))
    }
}

/// Level 2, the level of most daily note sections
impl Default for HeadingLevel {
    fn default() -> Self {
        Self::H2
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
