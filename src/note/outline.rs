//! Heading tree of a note

use super::{HeadingLevel, parser};
use regex::Regex;
use std::sync::LazyLock;

/// Any line closing a section body, including headings with no text
static BOUNDARY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?m)^(#{1,6})\s").ok());

static HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^#{1,6}[ \t]+(\S[^\r\n]*?)[ \t]*\r?$").ok());

/// Heading-delimited section with its nested subsections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// Heading text without markers
    pub heading_text: &'a str,

    /// Heading level
    pub level: HeadingLevel,

    /// Everything up to the next heading of the same or higher level,
    /// subsections included
    pub body: &'a str,

    /// Direct subsections
    pub children: Vec<Section<'a>>,
}

struct Heading<'a> {
    /// [`None`] for a bare `##` line, which only ends bodies
    text: Option<&'a str>,
    level: HeadingLevel,
    start: usize,
    body_start: usize,
}

/// Build the heading forest of `text`
///
/// Frontmatter is skipped. Bodies follow the same rules as
/// [`Sections::find`](super::Sections::find): blank lines right after a
/// heading are not part of the body.
///
/// # Example
/// ```
/// use obsidian_journal::note::outline;
///
/// let text = "---\njournal: day\n---\n# GTD\n## Inbox\n- a\n## Today's Tasks\n# Journal\nj\n";
/// let tree = outline(text);
///
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree[0].heading_text, "GTD");
/// assert_eq!(tree[0].children[1].heading_text, "Today's Tasks");
/// assert_eq!(tree[1].body, "j\n");
/// ```
#[must_use]
pub fn outline(text: &str) -> Vec<Section<'_>> {
    let content = parser::content_of(text);
    let (Some(boundary), Some(heading)) = (BOUNDARY.as_ref(), HEADING.as_ref()) else {
        return Vec::new();
    };

    let headings: Vec<_> = boundary
        .captures_iter(content)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let level = HeadingLevel::new(u8::try_from(caps.get(1)?.len()).ok()?)?;
            let line_end = content[start..]
                .find('\n')
                .map_or(content.len(), |newline| start + newline);
            let line = &content[start..line_end];

            Some(Heading {
                text: heading
                    .captures(line)
                    .and_then(|caps| caps.get(1))
                    .map(|text| text.as_str()),
                level,
                start,
                body_start: skip_blank_lines(content, line_end),
            })
        })
        .collect();

    build(content, &headings, content.len())
}

/// Position after the newline ending the heading line and any blank lines
fn skip_blank_lines(content: &str, line_end: usize) -> usize {
    let rest = &content[line_end..];
    let run = rest.len() - rest.trim_start().len();

    if run == rest.len() {
        return content.len();
    }

    rest[..run]
        .rfind('\n')
        .map_or(line_end, |newline| line_end + newline + 1)
}

fn build<'a>(content: &'a str, headings: &[Heading<'a>], region_end: usize) -> Vec<Section<'a>> {
    let mut sections = Vec::new();
    let mut index = 0;

    while let Some(heading) = headings.get(index) {
        let Some(heading_text) = heading.text else {
            index += 1;
            continue;
        };

        let next = headings[index + 1..]
            .iter()
            .position(|other| other.level <= heading.level)
            .map_or(headings.len(), |offset| index + 1 + offset);

        let body_end = headings.get(next).map_or(region_end, |other| other.start);
        let body_start = heading.body_start.min(body_end);

        sections.push(Section {
            heading_text,
            level: heading.level,
            body: &content[body_start..body_end],
            children: build(content, &headings[index + 1..next], body_end),
        });

        index = next;
    }

    sections
}
