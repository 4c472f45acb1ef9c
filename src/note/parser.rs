//! Splitting a note into its frontmatter block and content

use thiserror::Error;

/// Result of [`parse_note`]
#[derive(Debug, PartialEq, Eq)]
pub enum ResultParse<'a> {
    /// Note starts with a closed `---` block
    WithProperties {
        /// Raw lines between the delimiters (with their newlines)
        properties: &'a str,

        /// Everything after the closing delimiter line
        content: &'a str,
    },

    /// Note has no frontmatter block
    WithoutProperties,
}

/// Errors for [`parse_note`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Opening `---` without a closing one
    #[error("Not found closer in frontmatter like `---`")]
    NotFoundCloser,
}

fn is_delimiter(line: &str) -> bool {
    line.trim() == "---"
}

/// Split `raw_text` into frontmatter and content
///
/// The block must open on the very first line. Delimiter lines may carry
/// surrounding whitespace (`"---  \r\n"` counts).
///
/// # Errors
/// - [`Error::NotFoundCloser`] if the first line opens a block that is never closed
///
/// # Example
/// ```
/// use obsidian_journal::note::parser::{ResultParse, parse_note};
///
/// let parsed = parse_note("---\nmood: ok\n---\n# Day\n").unwrap();
/// assert_eq!(
///     parsed,
///     ResultParse::WithProperties {
///         properties: "mood: ok\n",
///         content: "# Day\n"
///     }
/// );
/// ```
pub fn parse_note(raw_text: &str) -> Result<ResultParse<'_>, Error> {
    let mut lines = raw_text.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Ok(ResultParse::WithoutProperties);
    };

    if !is_delimiter(first) {
        return Ok(ResultParse::WithoutProperties);
    }

    let properties_start = first.len();
    let mut offset = properties_start;

    for line in lines {
        if is_delimiter(line) {
            return Ok(ResultParse::WithProperties {
                properties: &raw_text[properties_start..offset],
                content: &raw_text[offset + line.len()..],
            });
        }

        offset += line.len();
    }

    Err(Error::NotFoundCloser)
}

/// Content of the note without its frontmatter
///
/// An unclosed block is not stripped.
#[must_use]
pub fn content_of(raw_text: &str) -> &str {
    match parse_note(raw_text) {
        Ok(ResultParse::WithProperties { content, .. }) => content,
        Ok(ResultParse::WithoutProperties) | Err(Error::NotFoundCloser) => raw_text,
    }
}
